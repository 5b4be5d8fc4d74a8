//! Host termination signals as an explicit, droppable event source.

#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use std::fmt;
use std::io;

use log::debug;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;

use crate::runtime::ControlVerb;
use crate::utils::constants::SIGNAL_QUEUE_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    Interrupt,
    Terminate,
    Quit,
    Hangup,
}

impl HostSignal {
    /// Verb forwarded to the container when this signal reaches the coordinator.
    ///
    /// SIGKILL never reaches a process, so SIGQUIT carries the forceful request.
    pub fn control_verb(&self) -> ControlVerb {
        return match self {
            HostSignal::Quit => ControlVerb::Kill,
            HostSignal::Interrupt | HostSignal::Terminate | HostSignal::Hangup => {
                ControlVerb::Stop
            }
        };
    }
}

impl fmt::Display for HostSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostSignal::Interrupt => "interrupt",
            HostSignal::Terminate => "terminated",
            HostSignal::Quit => "quit",
            HostSignal::Hangup => "hangup",
        };
        return f.write_str(name);
    }
}

/// Subscription to host termination signals.
///
/// Signals are queued in a channel of capacity [`SIGNAL_QUEUE_CAPACITY`].
/// Dropping the subscription stops the forwarding task, which releases the
/// per-kind signal streams.
pub struct SignalSubscription {
    receiver: Receiver<HostSignal>,
    forwarder: Option<JoinHandle<()>>,
}

impl SignalSubscription {
    /// Registers for the host's termination signals.
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen() -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel(SIGNAL_QUEUE_CAPACITY);
        let forwarder = spawn_forwarder(sender)?;
        return Ok(SignalSubscription {
            receiver,
            forwarder: Some(forwarder),
        });
    }

    /// Subscription fed by hand instead of by the host.
    pub fn manual() -> (Sender<HostSignal>, Self) {
        let (sender, receiver) = mpsc::channel(SIGNAL_QUEUE_CAPACITY);
        return (
            sender,
            SignalSubscription {
                receiver,
                forwarder: None,
            },
        );
    }

    /// Next signal, `None` once no more signals can arrive.
    pub async fn recv(&mut self) -> Option<HostSignal> {
        return self.receiver.recv().await;
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            debug!("Deregistering host signal listeners");
            forwarder.abort();
        }
    }
}

#[cfg(unix)]
fn spawn_forwarder(sender: Sender<HostSignal>) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut hangup = signal(SignalKind::hangup())?;

    return Ok(tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                Some(()) = interrupt.recv() => HostSignal::Interrupt,
                Some(()) = terminate.recv() => HostSignal::Terminate,
                Some(()) = quit.recv() => HostSignal::Quit,
                Some(()) = hangup.recv() => HostSignal::Hangup,
                else => break,
            };
            debug!("Host delivered {received}");
            if sender.send(received).await.is_err() {
                break;
            }
        }
    }));
}

#[cfg(not(unix))]
fn spawn_forwarder(sender: Sender<HostSignal>) -> io::Result<JoinHandle<()>> {
    return Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            debug!("Host delivered {}", HostSignal::Interrupt);
            if sender.send(HostSignal::Interrupt).await.is_err() {
                break;
            }
        }
    }));
}

#[cfg(test)]
#[path = "../tests/coordinator/test_signals.rs"]
mod test_signals;
