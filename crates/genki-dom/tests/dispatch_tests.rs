//! Integration tests for click dispatch through a document.

use std::sync::Arc;

use genki_dom::{ClickEvent, DispatchResult, Document, Dom, EventPhase, NodeId};
use parking_lot::Mutex;

type Log = Arc<Mutex<Vec<String>>>;

fn setup() -> (Document, NodeId, NodeId, NodeId) {
    let mut document = Document::new();
    let body = document.body();
    document
        .insert_html(
            body,
            r#"<div id="outer"><div id="inner"><span id="leaf">x</span></div></div>"#,
        )
        .unwrap();
    let outer = document.element_by_id("outer").unwrap();
    let inner = document.element_by_id("inner").unwrap();
    let leaf = document.element_by_id("leaf").unwrap();
    (document, outer, inner, leaf)
}

fn record(document: &mut Document, node: NodeId, log: &Log, name: &'static str) {
    let log = log.clone();
    document
        .add_listener(node, move |_dom, event| {
            let phase = match event.phase() {
                EventPhase::AtTarget => "target",
                EventPhase::Bubbling => "bubble",
            };
            log.lock().push(format!("{name}:{phase}"));
        })
        .unwrap();
}

#[test]
fn test_click_bubbles_nearest_first() {
    let (mut document, outer, inner, leaf) = setup();
    let log: Log = Arc::default();
    let root = document.root();

    record(&mut document, root, &log, "root");
    record(&mut document, outer, &log, "outer");
    record(&mut document, inner, &log, "inner");
    record(&mut document, leaf, &log, "leaf");

    assert_eq!(document.click(leaf), DispatchResult::Delivered);
    assert_eq!(
        *log.lock(),
        vec!["leaf:target", "inner:bubble", "outer:bubble", "root:bubble"]
    );
}

#[test]
fn test_clicking_text_node_bubbles_to_element() {
    let (mut document, _, _, leaf) = setup();
    let log: Log = Arc::default();
    record(&mut document, leaf, &log, "leaf");

    let text = document.dom().children(leaf).unwrap()[0];
    document.click(text);
    assert_eq!(*log.lock(), vec!["leaf:bubble"]);
}

#[test]
fn test_same_node_listeners_run_in_registration_order() {
    let (mut document, outer, _, _) = setup();
    let log: Log = Arc::default();
    record(&mut document, outer, &log, "one");
    record(&mut document, outer, &log, "two");

    document.click(outer);
    assert_eq!(*log.lock(), vec!["one:target", "two:target"]);
}

#[test]
fn test_stop_propagation_keeps_same_node_listeners() {
    let (mut document, outer, inner, _) = setup();
    let log: Log = Arc::default();

    document
        .add_listener(inner, |_dom, event| event.stop_propagation())
        .unwrap();
    record(&mut document, inner, &log, "inner");
    record(&mut document, outer, &log, "outer");

    assert_eq!(document.click(inner), DispatchResult::Stopped);
    assert_eq!(*log.lock(), vec!["inner:target"]);
}

#[test]
fn test_click_without_listeners_is_ignored() {
    let (mut document, _, _, leaf) = setup();
    assert_eq!(document.click(leaf), DispatchResult::Ignored);
}

#[test]
fn test_listeners_can_mutate_the_tree() {
    let (mut document, outer, _, leaf) = setup();
    document
        .add_listener(outer, |dom: &mut Dom, event: &mut ClickEvent| {
            let text = dom.text_content(event.target());
            dom.set_text_content(event.current_target(), &format!("clicked {text}"))
                .unwrap();
        })
        .unwrap();

    document.click(leaf);
    assert_eq!(document.dom().text_content(outer), "clicked x");
    assert!(!document.dom().is_alive(leaf));
}

#[test]
fn test_detach_by_id_after_reuse_of_shared_handler() {
    let (mut document, outer, _, _) = setup();
    let hits = Arc::new(Mutex::new(0));
    let counter = hits.clone();
    let handler: genki_dom::ClickHandler =
        Arc::new(move |_: &mut Dom, _: &mut ClickEvent| *counter.lock() += 1);

    let first = document.add_shared_listener(outer, handler.clone()).unwrap();
    assert!(document.remove_listener(first));

    let second = document.add_shared_listener(outer, handler).unwrap();
    document.click(outer);
    assert_eq!(*hits.lock(), 1);

    assert!(document.remove_listener(second));
    document.click(outer);
    assert_eq!(*hits.lock(), 1);
    assert_eq!(document.listener_count(), 0);
}

#[test]
fn test_outside_click_sees_bubbled_inside_clicks() {
    let (mut document, outer, inner, leaf) = setup();
    let log: Log = Arc::default();

    let outside_log = log.clone();
    document
        .watch_outside_clicks(
            inner,
            Arc::new(move |_: &mut Dom, _: &ClickEvent| outside_log.lock().push("outside".into())),
        )
        .unwrap();
    record(&mut document, inner, &log, "inner");

    document.click(leaf);
    assert_eq!(*log.lock(), vec!["inner:bubble"]);

    document.click(outer);
    assert_eq!(*log.lock(), vec!["inner:bubble", "outside"]);
}

#[test]
fn test_removing_owner_ends_its_watch() {
    let (mut document, outer, inner, _) = setup();
    let watch = document
        .watch_outside_clicks(inner, Arc::new(|_: &mut Dom, _: &ClickEvent| {}))
        .unwrap();
    assert!(document.is_watching(watch));

    document.remove_node(outer).unwrap();
    assert!(!document.is_watching(watch));
    assert_eq!(document.listener_count(), 0);
}

#[test]
fn test_insert_html_with_trace_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut document = Document::new();
        let body = document.body();
        let inserted = document
            .insert_html(body, r#"<div id="logged"><span>x</span></div>"#)
            .unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(document.element_by_id("logged"), Some(inserted[0]));
    });
}
