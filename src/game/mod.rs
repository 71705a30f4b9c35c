//! Tower gameplay: presentation glue around the arithmetic engine.
//!
//! The engine itself (problem generation, progression, building model, answer
//! evaluation) lives in the submodules below and is pure Rust, testable on the
//! host. This file owns the browser side: it builds the DOM on demand, wires
//! input listeners, keeps the [`session::Session`] in a thread-local cell, and
//! drives timed transitions (success pause, staggered collapse) from a
//! `requestAnimationFrame` loop via the [`phase::Phase`] state machine.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlInputElement, window};

pub mod building;
pub mod evaluate;
pub mod phase;
pub mod problem;
pub mod progress;
pub mod rng;
pub mod session;

use self::building::FloorKind;
use self::evaluate::Outcome;
use self::phase::{Phase, PhaseEvent};
use self::problem::OperationSelection;
use self::progress::ScoreStore;
use self::rng::Lcg;
use self::session::Session;

// --- Best-score persistence ---------------------------------------------------

/// Key kept from the original release so existing records survive.
const STORAGE_KEY: &str = "mathGameRecord";

/// `localStorage`-backed best score. Storage failures (private browsing,
/// quota) degrade to an in-memory zero; the game itself never fails on them.
pub struct LocalStorageScore;

impl ScoreStore for LocalStorageScore {
    fn load(&self) -> u32 {
        window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    fn save(&mut self, best: u32) {
        if let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) {
            storage.set_item(STORAGE_KEY, &best.to_string()).ok();
        }
    }
}

// --- Runtime state ------------------------------------------------------------

struct TowerState {
    session: Session<LocalStorageScore>,
    phase: Phase,
}

thread_local! {
    static TOWER_STATE: std::cell::RefCell<Option<TowerState>> = std::cell::RefCell::new(None);
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn new_rng(now: f64) -> Lcg {
    #[cfg(feature = "rng")]
    {
        let _ = now;
        Lcg::from_entropy()
    }
    #[cfg(not(feature = "rng"))]
    {
        Lcg::from_clock(now)
    }
}

// --- Entry point --------------------------------------------------------------

#[wasm_bindgen]
pub fn start_tower_mode() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    ensure_ui(&doc)?;

    let now = now_ms();
    let session = Session::new(
        OperationSelection::default(),
        new_rng(now),
        LocalStorageScore,
    );
    TOWER_STATE.with(|cell| {
        cell.replace(Some(TowerState {
            session,
            phase: Phase::Idle,
        }))
    });

    render_all(&doc);

    // Check button and Enter key share the evaluation path.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            submit_answer();
        }) as Box<dyn FnMut(_)>);
        if let Some(btn) = doc.get_element_by_id("mt-check") {
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        }
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key() == "Enter" {
                submit_answer();
            }
        }) as Box<dyn FnMut(_)>);
        if let Some(input) = doc.get_element_by_id("mt-answer") {
            input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        }
        closure.forget();
    }
    // Hint visibility only shows or hides the line; the hint is always computed.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                update_hint_visibility(&doc);
            }
        }) as Box<dyn FnMut(_)>);
        if let Some(el) = doc.get_element_by_id("mt-hint-toggle") {
            el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        }
        closure.forget();
    }
    // Operation toggles: reverting any change that would empty the selection,
    // then requesting a fresh problem.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            on_operation_toggle();
        }) as Box<dyn FnMut(_)>);
        for id in ["mt-op-add", "mt-op-sub"] {
            if let Some(el) = doc.get_element_by_id(id) {
                el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            }
        }
        closure.forget();
    }

    start_tower_loop();
    Ok(())
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_tower_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        tower_tick(ts);
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

// --- Tick ---------------------------------------------------------------------

fn tower_tick(now: f64) {
    let event = TOWER_STATE.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .and_then(|state| state.phase.advance(now))
    });
    let Some(event) = event else { return };
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    match event {
        PhaseEvent::CollapseFloor(index) => mark_floor_collapsing(&doc, index),
        PhaseEvent::ResetBuilding => {
            TOWER_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    state.session.collapse();
                }
            });
            render_all(&doc);
        }
        PhaseEvent::NextProblem => {
            TOWER_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    state.session.next_problem();
                }
            });
            render_problem(&doc);
        }
    }
}

// --- Input handling -----------------------------------------------------------

fn submit_answer() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let raw = answer_input(&doc).map(|i| i.value()).unwrap_or_default();

    let outcome = TOWER_STATE.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let state = borrow.as_mut()?;
        // A timed sequence is already running (success pause or collapse);
        // the problem on screen is stale, so the submission is dropped.
        if !state.phase.is_idle() {
            return None;
        }
        let outcome = state.session.answer(&raw);
        let now = now_ms();
        match outcome {
            Outcome::Correct => state.phase = Phase::after_correct(now),
            Outcome::Incorrect(_) => {
                state.phase = Phase::after_wrong(now, state.session.building().len());
            }
            Outcome::NotANumber => {}
        }
        Some(outcome)
    });

    match outcome {
        None => {}
        Some(Outcome::NotANumber) => set_feedback(&doc, "Enter a number!", "feedback wrong"),
        Some(Outcome::Correct) => {
            set_feedback(&doc, "Correct! Great job!", "feedback correct");
            render_counters(&doc);
            render_building(&doc);
        }
        Some(Outcome::Incorrect(expected)) => {
            set_feedback(&doc, &format!("Wrong! It was: {expected}"), "feedback wrong");
            // Boss styling drops as soon as the collapse starts.
            if let Some(body) = doc.body() {
                body.set_class_name("");
            }
        }
    }
}

fn on_operation_toggle() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let add_checked = checkbox_checked(&doc, "mt-op-add");
    let sub_checked = checkbox_checked(&doc, "mt-op-sub");
    TOWER_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            if !state.session.set_addition(add_checked) {
                set_checkbox(&doc, "mt-op-add", true);
            }
            if !state.session.set_subtraction(sub_checked) {
                set_checkbox(&doc, "mt-op-sub", true);
            }
            state.session.next_problem();
        }
    });
    render_problem(&doc);
}

// --- DOM construction ---------------------------------------------------------

/// Create the UI skeleton unless the page already provides it. Mirrors the
/// reuse-or-create pattern so the game can be embedded in a styled page or
/// boot standalone.
fn ensure_ui(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("mt-root").is_some() {
        return Ok(());
    }
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let root = doc.create_element("div")?;
    root.set_id("mt-root");
    root.set_attribute(
        "style",
        "display:flex; gap:40px; justify-content:center; align-items:flex-end; font-family:'Fira Code', monospace; padding:20px;",
    )
    .ok();

    let panel = doc.create_element("div")?;
    panel.set_id("mt-panel");

    let problem = doc.create_element("div")?;
    problem.set_id("mt-problem");
    problem.set_attribute("style", "font-size:32px; margin-bottom:8px;").ok();
    panel.append_child(&problem)?;

    let hint = doc.create_element("div")?;
    hint.set_id("mt-hint");
    hint.set_attribute(
        "style",
        "font-size:18px; color:#888; min-height:24px; visibility:hidden;",
    )
    .ok();
    panel.append_child(&hint)?;

    let answer: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
    answer.set_id("mt-answer");
    answer.set_type("text");
    answer.set_attribute("style", "font-size:24px; width:120px;").ok();
    panel.append_child(&answer)?;

    let check = doc.create_element("button")?;
    check.set_id("mt-check");
    check.set_text_content(Some("Check"));
    panel.append_child(&check)?;

    let feedback = doc.create_element("div")?;
    feedback.set_id("mt-feedback");
    feedback.set_class_name("feedback");
    feedback.set_attribute("style", "min-height:28px; font-size:20px;").ok();
    panel.append_child(&feedback)?;

    let counters = doc.create_element("div")?;
    counters.set_inner_html(
        "Floors: <span id='mt-floors'>0</span> &nbsp; Record: <span id='mt-record'>0</span>",
    );
    panel.append_child(&counters)?;

    let toggles = doc.create_element("div")?;
    toggles.set_id("mt-toggles");
    panel.append_child(&toggles)?;
    for (id, label, checked) in [
        ("mt-op-add", "Addition", true),
        ("mt-op-sub", "Subtraction", true),
        ("mt-hint-toggle", "Hint", false),
    ] {
        let cb: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
        cb.set_id(id);
        cb.set_type("checkbox");
        cb.set_checked(checked);
        toggles.append_child(&cb)?;
        let text = doc.create_element("label")?;
        text.set_text_content(Some(label));
        text.set_attribute("for", id).ok();
        toggles.append_child(&text)?;
    }

    root.append_child(&panel)?;

    let tower = doc.create_element("div")?;
    tower.set_id("mt-building");
    tower.set_attribute(
        "style",
        "display:flex; flex-direction:column-reverse; align-items:center; min-height:480px; justify-content:flex-start;",
    )
    .ok();
    root.append_child(&tower)?;

    body.append_child(&root)?;
    Ok(())
}

// --- Rendering ----------------------------------------------------------------

fn render_all(doc: &Document) {
    render_problem(doc);
    render_counters(doc);
    render_building(doc);
}

fn render_problem(doc: &Document) {
    let Some((problem_text, hint_text, boss)) = TOWER_STATE.with(|cell| {
        cell.borrow().as_ref().map(|s| {
            (
                s.session.problem_text(),
                s.session.hint_text(),
                s.session.is_boss_round(),
            )
        })
    }) else {
        return;
    };
    set_text(doc, "mt-problem", &problem_text);
    set_text(doc, "mt-hint", &hint_text);
    update_hint_visibility(doc);
    set_feedback(doc, "", "feedback");
    if let Some(body) = doc.body() {
        body.set_class_name(if boss { "boss-mode" } else { "" });
    }
    if let Some(input) = answer_input(doc) {
        input.set_value("");
        input.focus().ok();
    }
}

fn render_counters(doc: &Document) {
    let Some((floors, best)) = TOWER_STATE.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|s| (s.session.floors_cleared(), s.session.best()))
    }) else {
        return;
    };
    set_text(doc, "mt-floors", &floors.to_string());
    set_text(doc, "mt-record", &best.to_string());
}

/// Rebuild the building DOM from the layout descriptors. Floors are appended
/// bottom-first; the container uses `column-reverse` so the tower grows
/// upward.
fn render_building(doc: &Document) {
    let Some(layout) = TOWER_STATE.with(|cell| cell.borrow().as_ref().map(|s| s.session.layout()))
    else {
        return;
    };
    let Some(container) = doc.get_element_by_id("mt-building") else {
        return;
    };
    container.set_inner_html("");
    for floor in &layout.floors {
        let Ok(div) = doc.create_element("div") else {
            continue;
        };
        div.set_class_name(if floor.is_boss {
            "floor boss-floor"
        } else {
            "floor"
        });
        div.set_attribute(
            "style",
            &format!(
                "width:{}px; height:{}px; background:#b5651d; border:1px solid #7a4412; display:flex; justify-content:space-evenly; align-items:center; transition:transform 0.4s, opacity 0.4s;",
                floor.width_px, floor.height_px
            ),
        )
        .ok();
        match floor.kind {
            FloorKind::Boss => {
                if let Ok(face) = doc.create_element("div") {
                    face.set_class_name("boss-face");
                    face.set_text_content(Some("\u{1F608}"));
                    face.set_attribute("style", &format!("font-size:{}px;", floor.boss_face_px))
                        .ok();
                    div.append_child(&face).ok();
                }
            }
            FloorKind::Entrance => {
                for class in ["window", "door", "window"] {
                    if let Ok(child) = doc.create_element("div") {
                        child.set_class_name(class);
                        let (w, h) = if class == "door" {
                            (floor.door_w_px, floor.door_h_px)
                        } else {
                            (floor.window_w_px, floor.window_h_px)
                        };
                        let color = if class == "door" { "#5a3010" } else { "#9bd1ff" };
                        child
                            .set_attribute(
                                "style",
                                &format!("width:{w}px; height:{h}px; background:{color};"),
                            )
                            .ok();
                        div.append_child(&child).ok();
                    }
                }
            }
            FloorKind::Windows => {
                for _ in 0..3 {
                    if let Ok(win) = doc.create_element("div") {
                        win.set_class_name("window");
                        win.set_attribute(
                            "style",
                            &format!(
                                "width:{}px; height:{}px; background:#9bd1ff;",
                                floor.window_w_px, floor.window_h_px
                            ),
                        )
                        .ok();
                        div.append_child(&win).ok();
                    }
                }
            }
        }
        container.append_child(&div).ok();
    }
}

/// Tag the nth floor (0-based, bottom floor 0) with the `collapsing` class so
/// CSS can play the drop transition. Floor order in the DOM matches record
/// order, so the phase machine's top-to-bottom indices map directly.
fn mark_floor_collapsing(doc: &Document, index: usize) {
    let Some(container) = doc.get_element_by_id("mt-building") else {
        return;
    };
    if let Some(node) = container.children().item(index as u32) {
        let classes = node.class_name();
        node.set_class_name(&format!("{classes} collapsing"));
        node.set_attribute(
            "style",
            &format!("{} transform:translateY(40px) rotate(8deg); opacity:0;",
                node.get_attribute("style").unwrap_or_default()),
        )
        .ok();
    }
}

// --- Small DOM helpers --------------------------------------------------------

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_feedback(doc: &Document, text: &str, class: &str) {
    if let Some(el) = doc.get_element_by_id("mt-feedback") {
        el.set_text_content(Some(text));
        el.set_class_name(class);
    }
}

fn answer_input(doc: &Document) -> Option<HtmlInputElement> {
    doc.get_element_by_id("mt-answer")
        .and_then(|el| el.dyn_into().ok())
}

fn checkbox_checked(doc: &Document, id: &str) -> bool {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|cb| cb.checked())
        .unwrap_or(false)
}

fn set_checkbox(doc: &Document, id: &str, checked: bool) {
    if let Some(cb) = doc
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        cb.set_checked(checked);
    }
}

fn update_hint_visibility(doc: &Document) {
    let show = checkbox_checked(doc, "mt-hint-toggle");
    if let Some(hint) = doc.get_element_by_id("mt-hint") {
        if show {
            hint.set_attribute("style", "font-size:18px; color:#888; min-height:24px;").ok();
        } else {
            hint.set_attribute(
                "style",
                "font-size:18px; color:#888; min-height:24px; visibility:hidden;",
            )
            .ok();
        }
    }
}

// --- Optional JSON export -----------------------------------------------------

/// Building layout as JSON, for JS-side renderers that want to draw the tower
/// themselves.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn building_layout_json() -> String {
    TOWER_STATE.with(|cell| {
        cell.borrow()
            .as_ref()
            .and_then(|s| serde_json::to_string(&s.session.layout()).ok())
            .unwrap_or_default()
    })
}
