/// Scoring Actor - Serialised Access to a ScoringService
///
/// The service is single-writer. The actor owns it on a dedicated thread
/// and processes commands one at a time from an MPSC channel, replying on a
/// oneshot channel per command. Any number of `ScoringHandle` clones can
/// submit commands concurrently; they are applied in arrival order.
///
/// ## Usage
/// ```rust,ignore
/// let (actor, handle) = ScoringActor::new(ScoringService::new(store));
/// let worker = tokio::task::spawn_blocking(move || actor.run());
///
/// let reply = handle.execute(ScoringCommand::ListMatches).await?;
/// drop(handle);
/// let service = worker.await?;
/// ```

use super::scoring_service::ScoringService;
use crate::application::dto::{ScoringCommand, ScoringReply};
use crate::application::error::ServiceError;
use crate::infrastructure::persistence::MatchStore;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, info};

type Reply = Result<ScoringReply, ServiceError>;

struct Envelope {
    command: ScoringCommand,
    reply_to: oneshot::Sender<Reply>,
}

/// Owns a service and drains the command channel
pub struct ScoringActor<S: MatchStore> {
    service: ScoringService<S>,
    command_receiver: UnboundedReceiver<Envelope>,
}

/// Cloneable sender side of the actor
#[derive(Clone)]
pub struct ScoringHandle {
    command_sender: UnboundedSender<Envelope>,
}

impl<S: MatchStore> ScoringActor<S> {
    /// Creates the actor and the first handle to it
    pub fn new(service: ScoringService<S>) -> (Self, ScoringHandle) {
        let (command_sender, command_receiver) = mpsc::unbounded_channel();
        let actor = Self {
            service,
            command_receiver,
        };
        (actor, ScoringHandle { command_sender })
    }

    /// Runs the main loop until every handle is dropped, then hands the
    /// service back. Blocks the calling thread.
    pub fn run(mut self) -> ScoringService<S> {
        info!("scoring actor started");
        while let Some(Envelope { command, reply_to }) = self.command_receiver.blocking_recv() {
            let name = command.name();
            let reply = self.service.execute(command);
            if reply_to.send(reply).is_err() {
                debug!(command = name, "caller went away before the reply");
            }
        }
        info!("scoring actor stopped");
        self.service
    }
}

impl<S: MatchStore + 'static> ScoringActor<S> {
    /// Runs the actor on tokio's blocking pool
    pub fn spawn(service: ScoringService<S>) -> (ScoringHandle, tokio::task::JoinHandle<ScoringService<S>>) {
        let (actor, handle) = Self::new(service);
        let worker = tokio::task::spawn_blocking(move || actor.run());
        (handle, worker)
    }
}

impl ScoringHandle {
    /// Submits a command and waits for its reply
    pub async fn execute(&self, command: ScoringCommand) -> Reply {
        let (reply_to, reply) = oneshot::channel();
        self.command_sender
            .send(Envelope { command, reply_to })
            .map_err(|_| ServiceError::ActorUnavailable)?;
        reply.await.map_err(|_| ServiceError::ActorUnavailable)?
    }
}
