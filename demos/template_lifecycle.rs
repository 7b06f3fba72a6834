//! Template Lifecycle
//!
//! This demo drives a template through its data-store lifecycle while a
//! second caller races it to destroy the same row.
//!
//! Key concepts:
//! - Shared transition table and listener registry
//! - Pre-transition veto and post-transition usage records
//! - Optimistic concurrency with bounded retry
//!
//! Run with: RUST_LOG=lifecycle=debug cargo run --example template_lifecycle

use lifecycle::core::{EntityId, State};
use lifecycle::lifecycle::{object_lifecycle, ObjectEvent, ObjectState};
use lifecycle::listener::HistoryRecorder;
use lifecycle::{
    EngineConfig, FnListener, InMemoryStore, ListenerError, ListenerRegistry, StateMachine,
    TransitionContext,
};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lifecycle=debug".into()),
        )
        .init();

    println!("=== Template Lifecycle ===\n");

    let registry = Arc::new(ListenerRegistry::<ObjectState, ObjectEvent>::new());
    let history = Arc::new(HistoryRecorder::<ObjectState, ObjectEvent>::new());
    registry.register("template", history.clone())?;
    let capacity = FnListener::<ObjectState, ObjectEvent>::new("zone-capacity").on_pre(|info| {
        match info.context.payload() {
            Some(payload) if payload["zone"] == "full-zone" => {
                Err(ListenerError::new("zone has no secondary storage left"))
            }
            _ => Ok(true),
        }
    });
    registry.register("template", Arc::new(capacity))?;
    registry.register(
        "template",
        Arc::new(FnListener::<ObjectState, ObjectEvent>::new("usage").on_post(|info| {
            if info.to.is_final() {
                println!("  usage: template {} released", info.entity_id);
            }
            Ok(())
        })),
    )?;

    let store = Arc::new(InMemoryStore::new());
    let engine = Arc::new(
        StateMachine::builder()
            .kind("template")
            .table(object_lifecycle()?)
            .listeners(Arc::clone(&registry))
            .store(Arc::clone(&store))
            .config(EngineConfig::from_json(r#"{ "max_retries": 5 }"#)?)
            .build()?,
    );

    // A vetoed creation leaves the row untouched.
    let mut rejected = store.insert(1u64, ObjectState::INITIAL)?;
    let ctx = TransitionContext::new().with_payload(json!({ "zone": "full-zone" }));
    if let Err(e) = engine.transition(&mut rejected, ObjectEvent::CreateRequested, &ctx) {
        println!("Template 1: {e}");
    }
    println!("Template 1 is still {} at version {}\n", rejected.state, rejected.version);

    // The happy path.
    let mut template = store.insert(2u64, ObjectState::INITIAL)?;
    let ctx = TransitionContext::new()
        .initiated_by("admin")
        .with_payload(json!({ "zone": "zone-1" }));
    for event in [ObjectEvent::CreateRequested, ObjectEvent::OperationSucceeded] {
        let state = engine.transition(&mut template, event, &ctx)?;
        println!("Template 2: {event} -> {state} (version {})", template.version);
    }

    // Two callers destroy the same template from the same stale view.
    println!("\nRacing two destroy requests...");
    let handles: Vec<_> = (0..2)
        .map(|caller| {
            let engine = Arc::clone(&engine);
            let mut view = template.clone();
            thread::spawn(move || {
                let result = engine.transition(
                    &mut view,
                    ObjectEvent::DestroyRequested,
                    &TransitionContext::new().initiated_by(format!("caller-{caller}")),
                );
                (caller, result, view.version)
            })
        })
        .collect();
    for handle in handles {
        let (caller, result, version) = handle.join().map_err(|_| "destroy caller panicked")?;
        println!("  caller-{caller}: {result:?} at version {version}");
    }

    let mut template = engine.current(EntityId(2))?;
    engine.transition(&mut template, ObjectEvent::OperationSucceeded, &ctx)?;
    println!("\nTemplate 2 finished as {} at version {}", template.state, template.version);

    let recorded = history.history(EntityId(2));
    let path: Vec<&str> = recorded.get_path().into_iter().map(|s| s.name()).collect();
    println!("Recorded path: {}", path.join(" -> "));

    println!("\n=== Demo Complete ===");
    Ok(())
}
