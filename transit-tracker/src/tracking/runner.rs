//! The poll-and-fanout loop.
//!
//! A single task owns the [`Tracker`]. It interleaves two kinds of work in
//! one `select!` loop:
//!
//! - commands from connections (follow, leave, status), answered at once,
//!   even while a fetch is in flight;
//! - poll cycles: fetch → replace → recompute → diff & broadcast.
//!
//! Cycles never overlap. The timer for the next cycle is armed only after
//! the previous cycle finished (fixed delay, not fixed rate), so a slow
//! fetch pushes later cycles back.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, OptionFuture};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::domain::{RouteId, StopId, VehicleRecord};

use super::config::TrackerConfig;
use super::error::{TelemetryError, TrackingError};
use super::source::VehicleSource;
use super::subscriber::{Subscriber, SubscriberId};
use super::tracker::{FollowAck, Tracker, TrackerStatus};

type FetchResult = Result<Vec<VehicleRecord>, TelemetryError>;

enum Command {
    Follow {
        route: RouteId,
        stop: StopId,
        subscriber: Subscriber,
        reply: oneshot::Sender<Result<FollowAck, TrackingError>>,
    },
    Leave(SubscriberId),
    Status(oneshot::Sender<TrackerStatus>),
}

/// Cloneable handle for talking to the tracker task.
///
/// The loop stops once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    commands: mpsc::Sender<Command>,
}

impl TrackerHandle {
    /// Follow a (route, stop) pair.
    ///
    /// On success the stop info and any cached position have already been
    /// queued on the subscriber's channel, ahead of later broadcasts.
    pub async fn follow(
        &self,
        route: RouteId,
        stop: StopId,
        subscriber: Subscriber,
    ) -> Result<FollowAck, TrackingError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Follow {
                route,
                stop,
                subscriber,
                reply,
            })
            .await
            .map_err(|_| TrackingError::TrackerStopped)?;
        response.await.map_err(|_| TrackingError::TrackerStopped)?
    }

    /// Detach a closed connection from all its subscriptions.
    pub async fn leave(&self, subscriber: SubscriberId) {
        if self.commands.send(Command::Leave(subscriber)).await.is_err() {
            debug!(%subscriber, "tracker stopped before leave");
        }
    }

    pub async fn status(&self) -> Result<TrackerStatus, TrackingError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Status(reply))
            .await
            .map_err(|_| TrackingError::TrackerStopped)?;
        response.await.map_err(|_| TrackingError::TrackerStopped)
    }
}

/// Start the poll loop on the current runtime.
///
/// The first cycle runs immediately.
pub fn spawn<S: VehicleSource>(
    tracker: Tracker,
    source: Arc<S>,
    config: TrackerConfig,
) -> (TrackerHandle, JoinHandle<()>) {
    let (commands, receiver) = mpsc::channel(config.command_buffer);
    let task = tokio::spawn(run(tracker, source, receiver, config));
    (TrackerHandle { commands }, task)
}

async fn run<S: VehicleSource>(
    mut tracker: Tracker,
    source: Arc<S>,
    mut commands: mpsc::Receiver<Command>,
    config: TrackerConfig,
) {
    info!(
        interval = ?config.poll_interval,
        timeout = ?config.fetch_timeout,
        "poll loop started"
    );

    let mut in_flight: Option<BoxFuture<'static, FetchResult>> = None;
    let next_cycle = tokio::time::sleep(Duration::ZERO);
    tokio::pin!(next_cycle);

    loop {
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(command) => handle_command(&mut tracker, command),
                None => break,
            },

            Some(result) = OptionFuture::from(in_flight.as_mut()) => {
                in_flight = None;
                match result {
                    Ok(vehicles) => {
                        let report = tracker.apply_snapshot(vehicles);
                        debug!(
                            vehicles = report.vehicles,
                            keys = report.keys_evaluated,
                            broadcasts = report.broadcasts,
                            "poll cycle complete"
                        );
                    }
                    Err(err) => tracker.record_failure(&err),
                }
                next_cycle.as_mut().reset(Instant::now() + config.poll_interval);
            }

            () = &mut next_cycle, if in_flight.is_none() => {
                trace!("fetching vehicle positions");
                in_flight = Some(fetch(Arc::clone(&source), config.fetch_timeout));
            }
        }
    }

    info!("all tracker handles dropped, poll loop stopped");
}

fn fetch<S: VehicleSource>(source: Arc<S>, timeout: Duration) -> BoxFuture<'static, FetchResult> {
    Box::pin(async move {
        match tokio::time::timeout(timeout, source.fetch_vehicles()).await {
            Ok(result) => result,
            Err(_) => Err(TelemetryError::Timeout(timeout)),
        }
    })
}

fn handle_command(tracker: &mut Tracker, command: Command) {
    match command {
        Command::Follow {
            route,
            stop,
            subscriber,
            reply,
        } => {
            let result = tracker.follow(route, stop, subscriber.clone());
            if let Ok(ack) = &result {
                for message in ack.messages() {
                    subscriber.send(message);
                }
            }
            // The requester may have gone away; nothing to do then.
            let _ = reply.send(result);
        }
        Command::Leave(subscriber) => tracker.leave(subscriber),
        Command::Status(reply) => {
            let _ = reply.send(tracker.status());
        }
    }
}
