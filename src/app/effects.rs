//! Runs [`Command`]s against the directory and reports back as [`Msg`]s.
//!
//! Each command gets its own worker thread and no deadline. The completion is
//! sent over a channel and applied by the event loop, which is the only place
//! state changes.
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::directory::UserDirectory;

use super::reducer::{Command, Msg, SaveTarget};

/// Perform `command` on the calling thread and build its completion.
pub fn perform(directory: &dyn UserDirectory, command: Command) -> Msg {
    match command {
        Command::FetchUsers { request } => Msg::UsersLoaded {
            request,
            result: directory.list(),
        },
        Command::CreateUser { request, form } => Msg::Saved {
            request,
            target: SaveTarget::Create,
            result: directory.create(&form),
        },
        Command::UpdateUser { request, id, form } => {
            let result = directory.update(&id, &form);
            Msg::Saved {
                request,
                target: SaveTarget::Update(id),
                result,
            }
        }
        Command::DeleteUser { request, id } => {
            let result = directory.delete(&id);
            Msg::Deleted { request, id, result }
        }
    }
}

/// Spawns one worker per command and forwards completions to the event loop.
#[derive(Clone)]
pub struct Effects {
    directory: Arc<dyn UserDirectory>,
    outbox: Sender<Msg>,
}

impl Effects {
    /// Returns the executor and the receiving end the event loop drains.
    pub fn new(directory: Arc<dyn UserDirectory>) -> (Self, Receiver<Msg>) {
        let (outbox, inbox) = mpsc::channel();
        (Self { directory, outbox }, inbox)
    }

    pub fn spawn(&self, command: Command) -> std::io::Result<JoinHandle<()>> {
        let request = command.request();
        let directory = Arc::clone(&self.directory);
        let outbox = self.outbox.clone();
        tracing::debug!(%request, ?command, "dispatching command");
        thread::Builder::new()
            .name(format!("request-{}", request.0))
            .spawn(move || {
                let span = tracing::info_span!("request", id = %request);
                let _entered = span.enter();
                let msg = perform(directory.as_ref(), command);
                if outbox.send(msg).is_err() {
                    tracing::debug!("event loop gone; dropping completion");
                }
            })
    }
}

impl std::fmt::Debug for Effects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effects").finish_non_exhaustive()
    }
}
