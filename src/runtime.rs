//! Replay runtime.
//!
//! Reads newline-delimited dispatch payloads, runs them through the
//! translator and writes every produced event as one JSON line. Each shard
//! gets its own worker task, so payloads for one shard are handled in the
//! order they were read while shards proceed in parallel.

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::dispatch::{self, DispatchContext};
use crate::event::Event;
use crate::model::GuildRecord;
use crate::payload::{Dispatch, GatewayCommand, RequestGuildMembers, ShardCommand};
use crate::shard::{ChannelConnection, Outbound, ShardGroup};
use crate::store::StoreHolder;

const DISPATCH_BUFFER: usize = 256;
const OUTBOUND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// One input line: a dispatch tagged with the shard it arrived on.
#[derive(Debug, Deserialize)]
pub struct ShardDispatch {
    pub shard: u32,
    #[serde(flatten)]
    pub dispatch: Dispatch,
}

/// Counters reported once the input is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines: u64,
    pub skipped: u64,
    pub events: u64,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShardDispatch>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Replay stdin to stdout until input ends or ctrl-c.
pub async fn run(shard_count: u32, stores: Arc<StoreHolder>) -> anyhow::Result<ReplayStats> {
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    replay(input, tokio::io::stdout(), shard_count, stores, shutdown).await
}

/// Replay `input` into `output` across `shard_count` shards.
///
/// Shard connections are registered for the duration of the replay and
/// logged out at the end, after every worker drained its queue.
pub async fn replay<R, W, S>(
    input: R,
    output: W,
    shard_count: u32,
    stores: Arc<StoreHolder>,
    shutdown: S,
) -> anyhow::Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    S: Future<Output = ()>,
{
    let shards = Arc::new(ShardGroup::new(shard_count, stores.clone()));
    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let writer = tokio::spawn(write_events(output, event_rx));

    let mut queues = Vec::with_capacity(shard_count as usize);
    let mut workers = Vec::with_capacity(shard_count as usize);
    for index in 0..shard_count {
        let (connection, outbound) = ChannelConnection::new(index, OUTBOUND_BUFFER);
        shards.add(index, Arc::new(connection));
        tokio::spawn(drain_outbound(index, outbound));

        let (queue, receiver) = mpsc::channel(DISPATCH_BUFFER);
        queues.push(queue);
        workers.push(tokio::spawn(shard_worker(
            DispatchContext::new(stores.clone(), index),
            shards.clone(),
            receiver,
            event_tx.clone(),
        )));
    }
    drop(event_tx);
    info!("Replaying across {} shards", shard_count);

    let mut stats = ReplayStats::default();
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping input");
                break;
            }
        };
        let Some(line) = line else {
            debug!("Input exhausted after {} lines", stats.lines);
            break;
        };
        stats.lines += 1;

        let parsed = match parse_line(&line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping malformed line {}: {}", stats.lines, e);
                stats.skipped += 1;
                continue;
            }
        };

        let Some(queue) = queues.get(parsed.shard as usize) else {
            warn!(
                "Skipping line {}: shard {} out of range (shard count {})",
                stats.lines, parsed.shard, shard_count
            );
            stats.skipped += 1;
            continue;
        };

        if queue.send(parsed.dispatch).await.is_err() {
            warn!("Shard {} worker stopped, dropping line {}", parsed.shard, stats.lines);
            stats.skipped += 1;
        }
    }

    drop(queues);
    for worker in workers {
        worker.await?;
    }

    if let Err(e) = shards.logout().await {
        warn!("Logout finished with errors: {}", e);
    }

    stats.events = writer.await??;
    info!(
        "Replay done: {} lines, {} skipped, {} events",
        stats.lines, stats.skipped, stats.events
    );
    Ok(stats)
}

async fn shard_worker(
    ctx: DispatchContext,
    shards: Arc<ShardGroup>,
    mut queue: mpsc::Receiver<Dispatch>,
    events: mpsc::Sender<Event>,
) {
    while let Some(dispatch) = queue.recv().await {
        // Failures are logged by the translator and only drop this payload.
        let Ok(Some(event)) = dispatch::handle(&ctx, dispatch).await else {
            continue;
        };

        if let Event::GuildCreate(created) = &event {
            request_missing_members(&shards, ctx.shard_index, created.guild.data()).await;
        }

        if events.send(event).await.is_err() {
            warn!("Event writer gone, stopping shard {}", ctx.shard_index);
            break;
        }
    }
    debug!("Shard {} worker finished", ctx.shard_index);
}

/// Ask for the full member list when a created guild arrived with only part
/// of its members.
async fn request_missing_members(
    shards: &ShardGroup,
    shard_index: u32,
    guild: &GuildRecord,
) {
    let Some(total) = guild.member_count else {
        return;
    };
    if total as usize <= guild.members.len() {
        return;
    }

    debug!(
        "Guild {} has {} of {} members, requesting the rest",
        guild.id,
        guild.members.len(),
        total
    );
    let command = ShardCommand::new(
        shard_index,
        GatewayCommand::RequestGuildMembers(RequestGuildMembers {
            guild_id: guild.id,
            query: String::new(),
            limit: 0,
        }),
    );
    if let Err(e) = shards.unicast(&command).await {
        warn!("Member request for guild {} failed: {}", guild.id, e);
    }
}

/// Stand-in transport: logs what would go over the wire.
async fn drain_outbound(shard_index: u32, mut outbound: mpsc::Receiver<Outbound>) {
    while let Some(frame) = outbound.recv().await {
        match frame {
            Outbound::Command(command) => {
                debug!("Shard {} outbound: {:?}", shard_index, command);
            }
            Outbound::Close { force } => {
                debug!("Shard {} closed (force: {})", shard_index, force);
                break;
            }
        }
    }
}

async fn write_events<W>(mut output: W, mut events: mpsc::Receiver<Event>) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(event) = events.recv().await {
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        written += 1;
    }
    output.flush().await?;
    Ok(written)
}
