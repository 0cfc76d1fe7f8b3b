use std::sync::Arc;

use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::{
    dispatcher::Dispatcher,
    error::{Result, SmartContentError},
    session::{Command, Session, SessionSnapshot, Ticket},
    tracker::Generation,
    types::{AnalysisResult, ProcessingOptions},
};

/// Outcome of one backend call, tagged with the generation it was issued for.
#[derive(Debug)]
pub struct Completion {
    pub generation: Generation,
    pub request_id: Uuid,
    pub outcome: std::result::Result<AnalysisResult, String>,
}

struct Envelope {
    command: Command,
    ack: oneshot::Sender<SessionSnapshot>,
}

/// Front door to a running session loop.
pub struct SessionHandle {
    commands: mpsc::Sender<Envelope>,
    state: watch::Receiver<SessionSnapshot>,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Apply a command and return the snapshot right after it.
    pub async fn send(&self, command: Command) -> Result<SessionSnapshot> {
        let (ack, ack_rx) = oneshot::channel();
        self.commands
            .send(Envelope { command, ack })
            .await
            .map_err(|_| SmartContentError::SessionClosed)?;
        ack_rx.await.map_err(|_| SmartContentError::SessionClosed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.clone()
    }

    /// Wait until no request is loading.
    pub async fn wait_until_settled(&mut self) -> Result<SessionSnapshot> {
        let snapshot = self
            .state
            .wait_for(|s| !s.lifecycle.is_loading())
            .await
            .map_err(|_| SmartContentError::SessionClosed)?;
        Ok(snapshot.clone())
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}

/// Start the session loop on the current runtime.
pub fn spawn_session(dispatcher: Dispatcher, options: ProcessingOptions) -> SessionHandle {
    let session = Session::with_options(options);
    let (state_tx, state_rx) = watch::channel(session.snapshot());
    let (command_tx, command_rx) = mpsc::channel::<Envelope>(16);
    let (completion_tx, completion_rx) = mpsc::unbounded_channel::<Completion>();
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let runner = SessionRunner {
        session,
        dispatcher: Arc::new(dispatcher),
        completion_tx,
        state_tx,
    };
    let task = tokio::spawn(runner.run(command_rx, completion_rx, shutdown_rx));

    SessionHandle {
        commands: command_tx,
        state: state_rx,
        shutdown_tx,
        task,
    }
}

struct SessionRunner {
    session: Session,
    dispatcher: Arc<Dispatcher>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl SessionRunner {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Envelope>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.recv() => return,
                envelope = commands.recv() => {
                    let Some(Envelope { command, ack }) = envelope else {
                        return;
                    };
                    if let Some(ticket) = self.session.apply(command) {
                        self.start_call(ticket);
                    }
                    let _ = ack.send(self.publish());
                }
                Some(done) = completions.recv() => {
                    if !self.session.complete(done.generation, done.outcome) {
                        debug!(
                            request_id = %done.request_id,
                            generation = %done.generation,
                            "completion dropped, session moved on"
                        );
                    }
                    self.publish();
                }
            }
        }
    }

    fn start_call(&self, ticket: Ticket) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let completion_tx = self.completion_tx.clone();
        let span = info_span!(
            "request",
            request_id = %ticket.request_id,
            generation = %ticket.generation
        );

        tokio::spawn(
            async move {
                let outcome = dispatcher
                    .run(&ticket.call)
                    .await
                    .map_err(|e| e.to_string());
                let _ = completion_tx.send(Completion {
                    generation: ticket.generation,
                    request_id: ticket.request_id,
                    outcome,
                });
            }
            .instrument(span),
        );
    }

    fn publish(&self) -> SessionSnapshot {
        let snapshot = self.session.snapshot();
        self.state_tx.send_replace(snapshot.clone());
        snapshot
    }
}
