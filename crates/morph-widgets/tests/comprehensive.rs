//! Comprehensive tests for morph-widgets
//!
//! Whole-page scenarios driven through the runtime the way a browser
//! host would: native events in, ARIA state and custom events out.

use morph_dom::{EventType, NodeId, SimpleSelector};
use morph_widgets::{WidgetConfig, WidgetRuntime};

const PAGE: &str = r##"
    <div class="accordion" data-accordion="collapse" id="faq">
        <div class="accordion__item">
            <button class="accordion__item-trigger" id="q1" aria-expanded="true">Shipping</button>
            <div class="accordion__item-content" id="p1">Ships in two days.</div>
        </div>
        <div class="accordion__item">
            <button class="accordion__item-trigger" id="q2">Returns</button>
            <div class="accordion__item-content" id="p2">Thirty days.</div>
        </div>
        <div class="accordion__item">
            <button class="accordion__item-trigger" id="q3">Warranty</button>
            <div class="accordion__item-content" id="p3">One year.</div>
        </div>
    </div>

    <div class="tabs" id="settings">
        <div class="tabs__list">
            <button class="tabs__trigger" id="t1" aria-selected="true">General</button>
            <button class="tabs__trigger" id="t2">Profile</button>
            <button class="tabs__trigger" id="t3">Security</button>
            <button class="tabs__trigger" id="t4" disabled>Billing</button>
        </div>
        <div class="tabs__panel" id="tp1">General settings</div>
        <div class="tabs__panel" id="tp2">Profile settings</div>
        <div class="tabs__panel" id="tp3">Security settings</div>
        <div class="tabs__panel" id="tp4">Billing settings</div>
    </div>

    <button id="open-confirm" data-modal-target="confirm" aria-expanded="false">Delete</button>
    <div class="modal" id="confirm" aria-labelledby="confirm-title">
        <div class="modal__backdrop" id="confirm-backdrop"></div>
        <div class="modal__dialog">
            <h2 id="confirm-title">Delete this item?</h2>
            <button id="confirm-yes">Delete</button>
            <button id="confirm-no" data-modal-hide="confirm">Cancel</button>
        </div>
    </div>

    <div class="modal" id="locked" data-modal-backdrop="static" aria-labelledby="locked-title">
        <div class="modal__backdrop" id="locked-backdrop"></div>
        <div class="modal__dialog">
            <h2 id="locked-title">Saving</h2>
            <button id="locked-ok" data-modal-hide="locked">OK</button>
        </div>
    </div>

    <button id="open-nav" data-drawer-target="nav">Menu</button>
    <div class="drawer" id="nav" aria-label="Navigation">
        <div class="drawer__backdrop" id="nav-backdrop"></div>
        <a href="/home" id="nav-home">Home</a>
        <button id="nav-delete" data-modal-target="confirm">Delete account</button>
    </div>

    <button id="dd-a" data-dropdown-target="menu-a">Sort</button>
    <ul id="menu-a"><li><a href="#newest" id="menu-a-item">Newest</a></li></ul>
    <button id="dd-b" data-dropdown-target="menu-b">Filter</button>
    <ul id="menu-b"><li id="menu-b-item">In stock</li></ul>

    <button id="tip" data-tooltip-target="tip-body">?</button>
    <div id="tip-body" role="tooltip">Prices include tax.</div>

    <div class="input-text" id="field">
        <input class="input-text__input" id="password" type="password">
        <div class="input-text__action">
            <button data-clear-input id="clear">Clear</button>
            <button data-toggle-password id="eye" aria-label="Show password">
                <svg><use href="/icons.svg#icon-eye-regular"></use></svg>
            </button>
        </div>
    </div>
"##;

fn page() -> WidgetRuntime {
    page_with(WidgetConfig::default())
}

fn page_with(config: WidgetConfig) -> WidgetRuntime {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut runtime = WidgetRuntime::with_config(morph_html::parse(PAGE).unwrap(), config);
    runtime.initialize();
    runtime
}

fn names(runtime: &WidgetRuntime) -> Vec<String> {
    runtime.document().dispatched().iter().map(|e| e.name.clone()).collect()
}

fn count(runtime: &WidgetRuntime, name: &str) -> usize {
    runtime.document().dispatched().iter().filter(|e| e.name == name).count()
}

// ============================================================================
// ACCORDION
// ============================================================================

#[test]
fn test_accordion_exclusive_closes_before_opening() {
    let mut rt = page();
    assert!(rt.accordion.is_open("p1"));
    assert!(rt.document().is_hidden(rt.node("p2")));

    rt.click(rt.node("q2"));

    assert!(!rt.accordion.is_open("p1"));
    assert!(rt.accordion.is_open("p2"));
    assert_eq!(rt.document().attr(rt.node("q1"), "aria-expanded"), Some("false"));
    assert_eq!(rt.document().attr(rt.node("q2"), "aria-expanded"), Some("true"));
    assert!(rt.document().is_hidden(rt.node("p1")));
    assert!(!rt.document().is_hidden(rt.node("p2")));

    let events = rt.document().dispatched();
    assert_eq!(names(&rt), vec!["accordion:close", "accordion:open"]);
    assert_eq!(events[0].detail.index, Some(0));
    assert_eq!(events[1].detail.index, Some(1));
    assert_eq!(events[1].detail.panel, Some(rt.node("p2")));
    assert_eq!(events[1].target, rt.node("faq"));
}

#[test]
fn test_accordion_exclusive_never_has_two_open() {
    let mut rt = page();
    let faq = rt.node("faq");
    for id in ["q3", "q1", "q2", "q2", "q3", "q1"] {
        rt.click(rt.node(id));
        let open = rt.accordion.state(faq).iter().filter(|s| s.open).count();
        assert!(open <= 1, "{open} panels open after clicking {id}");
    }
}

#[test]
fn test_accordion_arrow_keys_move_focus_only() {
    let mut rt = page();
    rt.focus(rt.node("q1"));

    let event = rt.press("ArrowDown");
    assert!(event.is_default_prevented());
    assert_eq!(rt.document().active_element(), Some(rt.node("q2")));

    rt.press("End");
    assert_eq!(rt.document().active_element(), Some(rt.node("q3")));
    rt.press("ArrowDown");
    assert_eq!(rt.document().active_element(), Some(rt.node("q1")));
    rt.press("ArrowUp");
    assert_eq!(rt.document().active_element(), Some(rt.node("q3")));
    rt.press("Home");
    assert_eq!(rt.document().active_element(), Some(rt.node("q1")));

    // focus movement never changes which panel is open
    assert!(rt.accordion.is_open("p1"));
    assert!(rt.document().dispatched().is_empty());
}

// ============================================================================
// TABS
// ============================================================================

#[test]
fn test_tabs_initial_projection() {
    let rt = page();
    let doc = rt.document();
    let list = doc
        .tree()
        .query_first(rt.node("settings"), &SimpleSelector::Class("tabs__list".into()))
        .unwrap();
    assert_eq!(doc.attr(list, "role"), Some("tablist"));
    assert_eq!(doc.attr(rt.node("t1"), "role"), Some("tab"));
    assert_eq!(doc.attr(rt.node("t1"), "tabindex"), Some("0"));
    assert_eq!(doc.attr(rt.node("t2"), "tabindex"), Some("-1"));
    assert_eq!(doc.attr(rt.node("t2"), "aria-controls"), Some("tp2"));
    assert_eq!(doc.attr(rt.node("tp2"), "aria-labelledby"), Some("t2"));
    assert_eq!(doc.attr(rt.node("tp1"), "role"), Some("tabpanel"));
    assert!(!doc.is_hidden(rt.node("tp1")));
    assert!(doc.is_hidden(rt.node("tp2")));
}

#[test]
fn test_tabs_click_activates_exactly_one() {
    let mut rt = page();
    let settings = rt.node("settings");

    let event = rt.click(rt.node("t3"));
    assert!(event.is_default_prevented());
    assert_eq!(rt.tabs.active_index(settings), Some(2));
    assert_eq!(rt.tabs.state(settings).iter().filter(|s| s.open).count(), 1);
    assert_eq!(rt.document().attr(rt.node("t3"), "aria-selected"), Some("true"));
    assert_eq!(rt.document().attr(rt.node("t1"), "aria-selected"), Some("false"));
    assert!(rt.document().is_hidden(rt.node("tp1")));
    assert!(!rt.document().is_hidden(rt.node("tp3")));

    assert_eq!(names(&rt), vec!["tabs:change"]);
    assert_eq!(rt.document().dispatched()[0].detail.index, Some(2));

    // clicking the active tab again is a no-op
    rt.click(rt.node("t3"));
    assert_eq!(count(&rt, "tabs:change"), 1);
}

#[test]
fn test_tabs_arrow_right_skips_disabled_and_wraps() {
    let mut rt = page();
    let settings = rt.node("settings");
    rt.click(rt.node("t3"));
    rt.focus(rt.node("t3"));

    rt.press("ArrowRight");
    assert_eq!(rt.tabs.active_index(settings), Some(0));
    assert_eq!(rt.document().active_element(), Some(rt.node("t1")));

    rt.press("ArrowLeft");
    assert_eq!(rt.tabs.active_index(settings), Some(2));
    assert_eq!(rt.document().active_element(), Some(rt.node("t3")));

    rt.press("Home");
    assert_eq!(rt.tabs.active_index(settings), Some(0));
    rt.press("End");
    assert_eq!(rt.tabs.active_index(settings), Some(2));
    assert_eq!(rt.document().attr(rt.node("t3"), "tabindex"), Some("0"));
}

#[test]
fn test_tabs_disabled_trigger_ignores_clicks() {
    let mut rt = page();
    let settings = rt.node("settings");
    rt.click(rt.node("t4"));
    assert_eq!(rt.tabs.active_index(settings), Some(0));
    assert!(!rt.tabs.activate_by_id(&mut rt.host, "tp4"));
    assert!(rt.document().dispatched().is_empty());
}

// ============================================================================
// MODAL AND DRAWER
// ============================================================================

#[test]
fn test_modal_show_is_idempotent() {
    let mut rt = page();
    let confirm = rt.node("confirm");
    rt.click(rt.node("open-confirm"));

    assert!(rt.modal.is_open("confirm"));
    assert_eq!(rt.document().attr(confirm, "data-modal-state"), Some("open"));
    assert_eq!(rt.document().attr(confirm, "aria-hidden"), Some("false"));
    assert_eq!(rt.document().attr(confirm, "role"), Some("dialog"));
    assert_eq!(rt.document().attr(confirm, "aria-modal"), Some("true"));
    assert_eq!(rt.document().attr(rt.node("open-confirm"), "aria-expanded"), Some("true"));
    assert_eq!(rt.document().active_element(), Some(rt.node("confirm-yes")));

    assert!(!rt.modal.show(&mut rt.host, "confirm", None));
    rt.click(rt.node("open-confirm"));
    assert_eq!(count(&rt, "modal:show"), 1);
    assert_eq!(rt.host.scroll_lock.count(), 1);
    assert_eq!(rt.host.overlays.len(), 1);
}

#[test]
fn test_modal_escape_hides_and_returns_focus() {
    let mut rt = page();
    let opener = rt.node("open-confirm");
    rt.click(opener);

    let event = rt.press("Escape");
    assert!(event.is_default_prevented());
    assert!(!rt.modal.is_open("confirm"));
    assert_eq!(rt.document().attr(rt.node("confirm"), "data-modal-state"), Some("hidden"));
    assert_eq!(rt.document().attr(rt.node("confirm"), "aria-hidden"), Some("true"));
    assert_eq!(rt.document().attr(opener, "aria-expanded"), Some("false"));
    assert_eq!(rt.document().active_element(), Some(opener));
    assert_eq!(names(&rt), vec!["modal:show", "modal:hide"]);

    let hide = &rt.document().dispatched()[1];
    assert_eq!(hide.detail.id.as_deref(), Some("confirm"));
}

#[test]
fn test_modal_hide_button_and_backdrop() {
    let mut rt = page();
    rt.click(rt.node("open-confirm"));
    rt.click(rt.node("confirm-no"));
    assert!(!rt.modal.is_open("confirm"));

    rt.click(rt.node("open-confirm"));
    let event = rt.click(rt.node("confirm-backdrop"));
    assert!(event.is_default_prevented());
    assert!(!rt.modal.is_open("confirm"));
    assert!(!rt.host.scroll_lock.is_locked());
}

#[test]
fn test_modal_tab_is_trapped() {
    let mut rt = page();
    rt.click(rt.node("open-confirm"));
    let (yes, no) = (rt.node("confirm-yes"), rt.node("confirm-no"));

    rt.press_tab(false);
    assert_eq!(rt.document().active_element(), Some(no));
    let event = rt.press_tab(false);
    assert!(event.is_default_prevented());
    assert_eq!(rt.document().active_element(), Some(yes));
    rt.press_tab(true);
    assert_eq!(rt.document().active_element(), Some(no));
}

#[test]
fn test_escape_closes_most_recent_overlay_first() {
    let mut rt = page();
    rt.click(rt.node("open-nav"));
    assert!(rt.drawer.is_open("nav"));
    assert_eq!(rt.document().active_element(), Some(rt.node("nav-home")));

    rt.click(rt.node("nav-delete"));
    assert!(rt.modal.is_open("confirm"));
    assert_eq!(rt.host.scroll_lock.count(), 2);

    rt.press("Escape");
    assert!(!rt.modal.is_open("confirm"));
    assert!(rt.drawer.is_open("nav"));
    assert_eq!(rt.document().active_element(), Some(rt.node("nav-delete")));
    assert_eq!(rt.host.scroll_lock.count(), 1);

    rt.press("Escape");
    assert!(!rt.drawer.is_open("nav"));
    assert_eq!(rt.host.scroll_lock.count(), 0);
    assert_eq!(
        names(&rt),
        vec!["drawer:show", "modal:show", "modal:hide", "drawer:hide"]
    );
}

#[test]
fn test_scroll_lock_restores_exact_state() {
    let mut rt = page();
    let body = rt.document().body();
    rt.host.document.set_style(body, "position", "relative");
    rt.host.document.scroll_to(0.0, 420.0);

    rt.click(rt.node("open-nav"));
    assert_eq!(rt.document().style(body, "position"), Some("fixed"));
    assert_eq!(rt.document().style(body, "top"), Some("-420px"));
    assert_eq!(rt.document().style(body, "width"), Some("100%"));
    assert_eq!(rt.document().scroll_position().y, 0.0);

    // a second overlay does not re-save the pinned state
    rt.click(rt.node("nav-delete"));
    rt.press("Escape");
    assert_eq!(rt.document().style(body, "position"), Some("fixed"));

    rt.press("Escape");
    assert_eq!(rt.document().style(body, "position"), Some("relative"));
    assert_eq!(rt.document().style(body, "top"), None);
    assert_eq!(rt.document().style(body, "width"), None);
    assert_eq!(rt.document().scroll_position().y, 420.0);
}

#[test]
fn test_static_backdrop_shakes_without_closing() {
    let mut rt = page();
    let locked = rt.node("locked");
    assert!(rt.modal.show(&mut rt.host, "locked", None));

    let event = rt.click(rt.node("locked-backdrop"));
    assert!(!event.is_default_prevented());
    assert!(rt.modal.is_open("locked"));
    assert!(rt.document().has_class(locked, "modal--shake"));
    assert_eq!(count(&rt, "modal:hide"), 0);

    rt.advance(499);
    assert!(rt.document().has_class(locked, "modal--shake"));
    rt.advance(1);
    assert!(!rt.document().has_class(locked, "modal--shake"));
    assert!(rt.modal.is_open("locked"));

    rt.click(rt.node("locked-ok"));
    assert!(!rt.modal.is_open("locked"));
}

#[test]
fn test_repeated_shake_restarts_the_reset_timer() {
    let mut rt = page();
    let locked = rt.node("locked");
    rt.modal.show(&mut rt.host, "locked", None);

    rt.click(rt.node("locked-backdrop"));
    rt.advance(300);
    rt.click(rt.node("locked-backdrop"));
    rt.advance(300);
    assert!(rt.document().has_class(locked, "modal--shake"));
    rt.advance(200);
    assert!(!rt.document().has_class(locked, "modal--shake"));
    assert_eq!(rt.host.timers.len(), 0);
}

#[test]
fn test_resize_past_breakpoint_closes_after_debounce() {
    let mut rt = page();
    rt.resize(600.0, 800.0);
    rt.advance(1000);
    rt.click(rt.node("open-nav"));

    rt.resize(700.0, 800.0);
    rt.advance(100);
    rt.resize(900.0, 800.0);
    rt.advance(249);
    assert!(rt.drawer.is_open("nav"));

    rt.advance(1);
    assert!(!rt.drawer.is_open("nav"));
    assert!(!rt.host.scroll_lock.is_locked());
}

#[test]
fn test_resize_below_breakpoint_keeps_overlay() {
    let mut rt = page();
    rt.click(rt.node("open-nav"));
    rt.resize(500.0, 800.0);
    rt.advance(250);
    assert!(rt.drawer.is_open("nav"));
}

// ============================================================================
// DROPDOWN AND TOOLTIP
// ============================================================================

#[test]
fn test_dropdown_opening_one_closes_the_other() {
    let mut rt = page();
    let (a, b) = (rt.node("dd-a"), rt.node("dd-b"));

    rt.click(a);
    assert!(rt.dropdown.is_shown(a));
    assert!(rt.document().has_attr(rt.node("menu-a"), "data-show"));
    assert_eq!(rt.document().style(rt.node("menu-a"), "position"), Some("absolute"));

    rt.click(b);
    assert!(!rt.dropdown.is_shown(a));
    assert!(rt.dropdown.is_shown(b));
    assert!(!rt.document().has_attr(rt.node("menu-a"), "data-show"));

    rt.click(b);
    assert!(!rt.dropdown.is_shown(b));
}

#[test]
fn test_dropdown_outside_click_closes() {
    let mut rt = page();
    let a = rt.node("dd-a");
    rt.click(a);

    rt.click(rt.node("menu-a-item"));
    assert!(rt.dropdown.is_shown(a));

    rt.click(rt.node("faq"));
    assert!(!rt.dropdown.is_shown(a));
}

#[test]
fn test_dropdown_follows_trigger_geometry() {
    use morph_dom::DOMRect;

    let mut rt = page();
    let (a, menu) = (rt.node("dd-a"), rt.node("menu-a"));
    rt.host.document.set_bounding_rect(a, DOMRect::from_xywh(100.0, 50.0, 120.0, 30.0));
    rt.host.document.set_bounding_rect(menu, DOMRect::from_xywh(0.0, 0.0, 160.0, 90.0));

    rt.click(a);
    let pos = rt.dropdown.position(a).unwrap();
    assert_eq!(pos.x, 100.0);
    assert_eq!(pos.y, 88.0);
    assert_eq!(rt.document().style(menu, "min-width"), Some("120px"));
}

#[test]
fn test_tooltip_hover_and_focus() {
    let mut rt = page();
    let (tip, body) = (rt.node("tip"), rt.node("tip-body"));

    rt.hover(tip);
    assert!(rt.document().has_attr(body, "data-show"));
    rt.unhover(tip);
    assert!(!rt.document().has_attr(body, "data-show"));

    rt.focus(tip);
    assert!(rt.tooltip.is_shown(tip));
    rt.blur(tip);
    assert!(!rt.tooltip.is_shown(tip));
    assert_eq!(rt.document().active_element(), None);
}

// ============================================================================
// TEXT INPUT
// ============================================================================

#[test]
fn test_clear_button_follows_value() {
    let mut rt = page();
    let (input, clear) = (rt.node("password"), rt.node("clear"));
    assert!(rt.document().is_hidden(clear));

    rt.type_text(input, "hunter2");
    assert!(!rt.document().is_hidden(clear));

    rt.click(clear);
    assert_eq!(rt.document().value(input), "");
    assert!(rt.document().is_hidden(clear));
    assert_eq!(rt.document().active_element(), Some(input));
    assert_eq!(count(&rt, "input"), 1);
}

#[test]
fn test_password_toggle_through_clicks() {
    let mut rt = page();
    let (input, eye) = (rt.node("password"), rt.node("eye"));

    rt.click(eye);
    assert_eq!(rt.document().attr(input, "type"), Some("text"));
    assert_eq!(rt.document().attr(eye, "aria-label"), Some("Hide password"));

    rt.click(eye);
    assert_eq!(rt.document().attr(input, "type"), Some("password"));
    assert_eq!(rt.document().attr(eye, "aria-label"), Some("Show password"));
}

#[test]
fn test_wrapper_click_focuses_input() {
    let mut rt = page();
    rt.click(rt.node("field"));
    assert_eq!(rt.document().active_element(), Some(rt.node("password")));
}

// ============================================================================
// LIFECYCLE AND CONFIG
// ============================================================================

#[test]
fn test_destroy_restores_markup() {
    let mut rt = page();
    let body = rt.document().body();
    rt.click(rt.node("q2"));
    rt.click(rt.node("t2"));
    rt.click(rt.node("open-confirm"));
    rt.click(rt.node("dd-a"));
    rt.type_text(rt.node("password"), "x");

    rt.destroy();
    let doc = rt.document();

    assert_eq!(doc.attr(rt.node("q1"), "aria-expanded"), Some("true"));
    assert!(!doc.has_attr(rt.node("q2"), "aria-expanded"));
    assert!(!doc.has_attr(rt.node("p1"), "role"));
    assert!(!doc.has_attr(rt.node("p2"), "hidden"));
    assert!(!doc.has_attr(rt.node("t2"), "tabindex"));
    assert!(!doc.has_attr(rt.node("t2"), "aria-selected"));
    assert!(!doc.has_attr(rt.node("tp3"), "hidden"));

    let confirm = rt.node("confirm");
    assert!(!doc.has_attr(confirm, "role"));
    assert!(!doc.has_attr(confirm, "aria-modal"));
    assert!(!doc.has_attr(confirm, "aria-hidden"));
    assert!(!doc.has_attr(confirm, "data-modal-state"));
    assert_eq!(doc.attr(rt.node("open-confirm"), "aria-expanded"), Some("false"));
    assert_eq!(doc.style(body, "position"), None);

    let menu = rt.node("menu-a");
    assert!(!doc.has_attr(menu, "data-show"));
    assert_eq!(doc.style(menu, "transform"), None);
    assert!(!doc.has_attr(rt.node("clear"), "hidden"));

    assert!(doc.listeners().is_empty());
    assert!(rt.host.overlays.is_empty());
    assert!(!rt.host.scroll_lock.is_locked());
}

#[test]
fn test_refresh_rebuilds_from_markup() {
    let mut rt = page();
    rt.click(rt.node("q2"));
    rt.refresh();

    // state is re-read from the restored markup
    assert!(rt.accordion.is_open("p1"));
    assert!(!rt.accordion.is_open("p2"));
    assert_eq!(rt.accordion.groups().len(), 1);
    assert_eq!(rt.modal.len(), 2);
    assert_eq!(rt.document().listeners().count_for("accordion"), 2);
}

#[test]
fn test_config_from_json_drives_runtime() {
    let config = WidgetConfig::from_json(
        r#"{
            "accordion": { "keyboard_nav": false },
            "modal": { "close_on_escape": false, "shake_class": "wobble" }
        }"#,
    )
    .unwrap();
    let mut rt = page_with(config);

    assert!(rt.is_listening(NodeId::ROOT, EventType::Click));
    assert_eq!(rt.document().listeners().count_for("accordion"), 1);

    rt.focus(rt.node("q1"));
    rt.press("ArrowDown");
    assert_eq!(rt.document().active_element(), Some(rt.node("q1")));

    rt.click(rt.node("open-confirm"));
    rt.press("Escape");
    assert!(rt.modal.is_open("confirm"));

    rt.modal.hide(&mut rt.host, "confirm");
    rt.modal.show(&mut rt.host, "locked", None);
    rt.click(rt.node("locked-backdrop"));
    assert!(rt.document().has_class(rt.node("locked"), "wobble"));
}
