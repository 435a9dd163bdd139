use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::api::PlaylistApi;
use crate::config::FetchSettings;

use super::pipeline::load_playlist;
use super::types::{FetchCmd, FetchEvent};

/// Handle to the background thread that talks to the API.
///
/// Dropping the handle asks the worker to stop once its current load is done.
pub struct Fetcher {
    tx: Sender<FetchCmd>,
    join: Option<JoinHandle<()>>,
}

impl Fetcher {
    pub fn new(
        api: Box<dyn PlaylistApi + Send>,
        settings: FetchSettings,
        events: Sender<FetchEvent>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<FetchCmd>();
        let join = spawn_fetch_thread(api, settings, rx, events);

        Self {
            tx,
            join: Some(join),
        }
    }

    pub fn send(&self, cmd: FetchCmd) -> Result<(), mpsc::SendError<FetchCmd>> {
        self.tx.send(cmd)
    }

    /// Ask the worker to quit and wait for it.
    pub fn join(mut self) {
        let _ = self.tx.send(FetchCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        let _ = self.tx.send(FetchCmd::Quit);
    }
}

fn spawn_fetch_thread(
    api: Box<dyn PlaylistApi + Send>,
    settings: FetchSettings,
    rx: Receiver<FetchCmd>,
    events: Sender<FetchEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = rx.recv() {
            match cmd {
                FetchCmd::Load(id) => {
                    let mut emit = |ev: FetchEvent| events.send(ev).is_ok();
                    load_playlist(api.as_ref(), &id, &settings, &mut emit);
                }
                FetchCmd::Quit => break,
            }
        }
        tracing::debug!("fetch worker stopped");
    })
}
