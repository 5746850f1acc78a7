//! Host/frame ping-pong — establishes the channel and echoes a message back.
//!
//! Run with:
//!   cargo run --example ping-pong

use crossdoc::channel::Message;
use crossdoc::connector::{HostConnector, TargetSession};
use crossdoc::context::{ExecutionContext, FrameHandle};
use crossdoc::queue::Scheduler;

const FRAME_ORIGIN: &str = "https://widget.example";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let scheduler = Scheduler::new();

    // Embedded side: one session per frame document, wired lazily.
    let frame_context = ExecutionContext::new(&scheduler, FRAME_ORIGIN);
    let session: TargetSession<String> = TargetSession::new(frame_context.clone());
    let frame_messenger = session.messenger();
    let echo = frame_messenger.clone();
    frame_messenger.subscribe(move |message: Message<String>| {
        eprintln!("[frame] {} -> {}", message.msg_type, message.data);
        echo.emit(Message::new("pong", message.data));
    });

    // Host side: hand one channel end into the frame, scoped to its origin.
    let frame = FrameHandle::loaded(frame_context);
    let mut connector: HostConnector<String> = HostConnector::new();
    let host_messenger = connector
        .establish(Some(&frame), FRAME_ORIGIN)?
        .ok_or("frame should be addressable")?;

    host_messenger.subscribe(|message: Message<String>| {
        eprintln!("[host]  {} -> {}", message.msg_type, message.data);
    });

    host_messenger.emit(Message::new("ping", "hello from the host".to_string()));
    scheduler.run_until_idle();

    host_messenger.unsubscribe();
    frame_messenger.unsubscribe();
    Ok(())
}
