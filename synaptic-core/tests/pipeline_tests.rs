//! End-to-end pipeline tests
//!
//! Statements go in through the hub front door and descriptors come out of
//! a collecting sink; nothing reaches into stage internals.

mod common;

use std::sync::Arc;
use std::time::Duration;

use synaptic_config::SynapticConfig;
use synaptic_core::pipeline::{AnalysisService, ParsingService, ANALYSIS_AGENT_ID, PARSE_AGENT_ID};
use synaptic_core::{
    ApplicationState, ContextAction, ContextTarget, ServiceKind, SynapticHub, TaskingService,
};

use common::CollectingSink;

const TIMEOUT: Duration = Duration::from_secs(5);

fn hub_with_sink() -> (Arc<SynapticHub>, Arc<CollectingSink>) {
    let sink = CollectingSink::new();
    let hub = SynapticHub::new(SynapticConfig::default(), sink.clone()).unwrap();
    (hub, sink)
}

#[test]
fn test_valid_statement_reaches_sink() {
    let (hub, sink) = hub_with_sink();
    hub.process(Arc::from("[=proc simpleFunc :input :body ()]"))
        .unwrap();

    let received = sink.wait_for(1, TIMEOUT);
    assert_eq!(received[0].action, ContextAction::Create);
    assert_eq!(received[0].target, ContextTarget::Function);
    assert_eq!(received[0].source, "simpleFunc :input :body ()");

    hub.shutdown().unwrap();
}

#[test]
fn test_malformed_statement_is_forwarded_as_error() {
    let (hub, sink) = hub_with_sink();
    hub.process(Arc::from("proc broken")).unwrap();

    let received = sink.wait_for(1, TIMEOUT);
    assert_eq!(received[0].action, ContextAction::Error);
    assert_eq!(received[0].target, ContextTarget::None);
    assert!(received[0].source.is_empty());

    hub.shutdown().unwrap();
}

#[test]
fn test_statements_keep_submission_order() {
    let (hub, sink) = hub_with_sink();
    for name in ["first", "second", "third"] {
        hub.process(Arc::from(format!("[=proc {name} :input :body ()]").as_str()))
            .unwrap();
    }

    let received = sink.wait_for(3, TIMEOUT);
    let sources: Vec<&str> = received.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(
        sources,
        vec![
            "first :input :body ()",
            "second :input :body ()",
            "third :input :body ()"
        ]
    );

    hub.shutdown().unwrap();
}

#[test]
fn test_mixed_valid_and_invalid_statements() {
    let (hub, sink) = hub_with_sink();
    hub.process(Arc::from("[=proc ok :input :body ()]")).unwrap();
    hub.process(Arc::from("not a definition")).unwrap();
    hub.process(Arc::from("[=proc again :input x :body (x)]"))
        .unwrap();

    let received = sink.wait_for(3, TIMEOUT);
    assert_eq!(received[0].action, ContextAction::Create);
    assert_eq!(received[1].action, ContextAction::Error);
    assert_eq!(received[2].action, ContextAction::Create);
    assert_eq!(received[2].source, "again :input x :body (x)");

    hub.shutdown().unwrap();
}

#[test]
fn test_shutdown_leaves_no_agents_and_empty_queues() {
    let (hub, sink) = hub_with_sink();
    hub.process(Arc::from("[=proc f :input :body ()]")).unwrap();
    sink.wait_for(1, TIMEOUT);

    let tasking = hub.service::<TaskingService>(ServiceKind::Tasking).unwrap();
    let parsing = hub.service::<ParsingService>(ServiceKind::Parsing).unwrap();
    let analysis = hub.service::<AnalysisService>(ServiceKind::Analysis).unwrap();
    hub.shutdown().unwrap();

    assert_eq!(hub.state().application, ApplicationState::Shutdown);
    assert!(!tasking.has_agent(PARSE_AGENT_ID));
    assert!(!tasking.has_agent(ANALYSIS_AGENT_ID));
    assert!(!tasking.is_running());
    assert_eq!(parsing.pending(), 0);
    assert_eq!(analysis.pending(), 0);
}

#[test]
fn test_shutdown_drains_queues_with_work_in_flight() {
    let (hub, _sink) = hub_with_sink();
    for i in 0..2000 {
        hub.process(Arc::from(
            format!("[=proc f{i} :input :body ()]").as_str(),
        ))
        .unwrap();
    }

    //  shut down while both consumers are still working through the backlog
    let parsing = hub.service::<ParsingService>(ServiceKind::Parsing).unwrap();
    let analysis = hub.service::<AnalysisService>(ServiceKind::Analysis).unwrap();
    hub.shutdown().unwrap();

    assert_eq!(parsing.pending(), 0);
    assert_eq!(analysis.pending(), 0);
}

#[test]
fn test_work_submitted_after_shutdown_is_not_processed() {
    let (hub, sink) = hub_with_sink();
    hub.shutdown().unwrap();

    //  the front door still accepts, but no consumer remains
    hub.process(Arc::from("[=proc late :input :body ()]")).unwrap();
    std::thread::sleep(Duration::from_millis(200));
    assert!(sink.received().is_empty());
}
