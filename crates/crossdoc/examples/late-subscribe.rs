//! Emits before the channel is live and subscribes after it already is;
//! nothing crashes either way.
//!
//! Run with:
//!   cargo run --example late-subscribe

use crossdoc::channel::Message;
use crossdoc::connector::{HostConnector, TargetSession};
use crossdoc::context::{ExecutionContext, FrameHandle};
use crossdoc::queue::Scheduler;

const FRAME_ORIGIN: &str = "https://widget.example";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = Scheduler::new();

    let frame_context = ExecutionContext::new(&scheduler, FRAME_ORIGIN);
    let session: TargetSession<String> = TargetSession::new(frame_context.clone());
    let frame_messenger = session.messenger();

    // Emitting before the handshake has even been posted is a silent no-op.
    frame_messenger.emit(Message::new("early", "dropped on the floor".to_string()));

    let frame = FrameHandle::loaded(frame_context);
    let mut connector: HostConnector<String> = HostConnector::new();
    let host_messenger = connector
        .establish(Some(&frame), FRAME_ORIGIN)?
        .ok_or("frame should be addressable")?;
    scheduler.run_until_idle();

    // This one is sent before the frame subscribes: delivered to nobody.
    host_messenger.emit(Message::new("status", "nobody is listening yet".to_string()));
    scheduler.run_until_idle();

    // Late subscription sees subsequent traffic only.
    frame_messenger.subscribe(|message: Message<String>| {
        eprintln!("[frame] {} -> {}", message.msg_type, message.data);
    });
    host_messenger.emit(Message::new("status", "now it arrives".to_string()));
    scheduler.run_until_idle();

    Ok(())
}
