//! The channel polling engine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use indexmap::IndexMap;
use storage::Storage;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::channel::{ChannelKind, ChatIdentity, ChatMessage};
use crate::cursor::{CursorStore, SupportSide};
use crate::error::ChatError;
use crate::notes::{Note, NotesStore};
use crate::poller::{spawn_poll_loop, PollHandle, TickOutcome};
use crate::support::{max_last_event, SupportTicket};
use crate::transport::{
    ChatListQuery, ChatSendRequest, ChatSendResponse, ChatTransport, TransportError,
};

/// Messages requested when a window opens.
const BACKLOG_LIMIT: u32 = 200;
/// Messages requested per unread-watcher tick.
const UNREAD_LIMIT: u32 = 50;
/// Mailboxes requested in the admin support list.
const TICKET_LIST_LIMIT: u32 = 200;
/// In-memory cap per stream; only the newest messages are kept.
const MESSAGE_CAP: usize = 400;

/// Poll cadence. Both loops default to 4 s; anything in the 2–5 s band is
/// reasonable for this backend.
#[derive(Debug, Clone, Copy)]
pub struct PollIntervals {
    /// Cadence of the open-window poller.
    pub active: Duration,
    /// Cadence of the background unread watcher.
    pub background: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            active: Duration::from_secs(4),
            background: Duration::from_secs(4),
        }
    }
}

/// An id-ordered message stream (group or admins).
#[derive(Debug, Clone, Default)]
pub struct StreamState {
    pub messages: Vec<ChatMessage>,
    /// Highest id currently held; the next fetch asks for strictly newer.
    pub last_id: i64,
}

impl StreamState {
    fn absorb(&mut self, incoming: Vec<ChatMessage>, replace: bool) {
        if replace {
            self.messages = incoming;
        } else {
            self.messages.extend(incoming);
        }
        if self.messages.len() > MESSAGE_CAP {
            let drop = self.messages.len() - MESSAGE_CAP;
            self.messages.drain(..drop);
        }
        if let Some(last) = self.messages.last() {
            self.last_id = self.last_id.max(last.id);
        }
    }
}

/// Per-channel unread badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadFlags {
    pub group: bool,
    pub admins: bool,
    pub support: bool,
}

/// Support mailbox state. For a non-admin, `ticket` is their own mailbox;
/// for an admin, `tickets` is the mailbox list and `ticket` the selected one.
#[derive(Debug, Clone, Default)]
pub struct SupportState {
    pub ticket: Option<SupportTicket>,
    pub tickets: IndexMap<String, SupportTicket>,
    pub selected: Option<String>,
}

/// Everything the chat panel renders from.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// The open channel window, if any. At most one at a time.
    pub open: Option<ChannelKind>,
    pub group: StreamState,
    pub admins: StreamState,
    pub unread: UnreadFlags,
    pub support: SupportState,
    pub notes: Vec<Note>,
    /// Error shown inside the open window (load/send/poll failures).
    pub window_error: Option<String>,
    /// A send is in flight; duplicate submission is refused meanwhile.
    pub sending: bool,
    /// Newest ids the unread watcher has observed, independent of any
    /// open window.
    pub(crate) known_group: i64,
    pub(crate) known_admins: i64,
}

impl ChatState {
    pub fn stream(&self, kind: ChannelKind) -> Option<&StreamState> {
        match kind {
            ChannelKind::Group => Some(&self.group),
            ChannelKind::Admins => Some(&self.admins),
            _ => None,
        }
    }

    fn stream_mut(&mut self, kind: ChannelKind) -> Option<&mut StreamState> {
        match kind {
            ChannelKind::Group => Some(&mut self.group),
            ChannelKind::Admins => Some(&mut self.admins),
            _ => None,
        }
    }

    fn known(&self, kind: ChannelKind) -> i64 {
        match kind {
            ChannelKind::Group => self.known_group,
            ChannelKind::Admins => self.known_admins,
            _ => 0,
        }
    }

    fn raise_known(&mut self, kind: ChannelKind, id: i64) {
        match kind {
            ChannelKind::Group => self.known_group = self.known_group.max(id),
            ChannelKind::Admins => self.known_admins = self.known_admins.max(id),
            _ => {}
        }
    }
}

struct EngineCore<T> {
    transport: Arc<T>,
    identity: ChatIdentity,
    cursors: CursorStore,
    notes: NotesStore,
    state: RwLock<ChatState>,
    intervals: PollIntervals,
}

/// Coordinates the chat panel against the backend.
///
/// One engine exists per authenticated session. It owns at most one
/// active-window poll loop (switching channels cancels the previous loop
/// before the next one starts) plus an optional background unread watcher;
/// both are cancelled cooperatively on close, logout or drop.
pub struct ChatEngine<T: ChatTransport> {
    core: Arc<EngineCore<T>>,
    active: Mutex<Option<PollHandle>>,
    watcher: Mutex<Option<PollHandle>>,
}

impl<T: ChatTransport> ChatEngine<T> {
    pub fn new(
        transport: Arc<T>,
        identity: ChatIdentity,
        storage: &Storage,
        intervals: PollIntervals,
    ) -> Self {
        let cursors = CursorStore::new(storage.tab().clone(), identity.usuario.clone());
        let notes = NotesStore::new(storage.tab().clone(), identity.usuario.clone());
        Self {
            core: Arc::new(EngineCore {
                transport,
                identity,
                cursors,
                notes,
                state: RwLock::new(ChatState::default()),
                intervals,
            }),
            active: Mutex::new(None),
            watcher: Mutex::new(None),
        }
    }

    /// Current panel state, cloned for rendering.
    pub async fn snapshot(&self) -> ChatState {
        self.core.state.read().await.clone()
    }

    /// The user's join timestamps and seen markers.
    pub fn cursors(&self) -> &CursorStore {
        &self.core.cursors
    }

    /// Open a channel window, closing any previous one first.
    ///
    /// Streams fetch their backlog since the join timestamp (first open) or
    /// since the last held id, then start the active poll loop. A transient
    /// fetch failure still leaves the window open and polling; a 403/500
    /// leaves the window open with an error and no loop.
    pub async fn open(&self, kind: ChannelKind) -> Result<(), ChatError> {
        if !kind.available_to(self.core.identity.admin) {
            return Err(ChatError::AdminOnly);
        }

        self.cancel_active();
        {
            let mut st = self.core.state.write().await;
            st.open = Some(kind);
            st.window_error = None;
        }
        info!("opening channel {kind}");

        let result = match kind {
            ChannelKind::Group | ChannelKind::Admins => self.core.open_stream(kind).await,
            ChannelKind::Support => self.core.open_support().await,
            ChannelKind::Notes => {
                let notes = self.core.notes.load();
                self.core.state.write().await.notes = notes;
                Ok(())
            }
        };

        if let Err(e) = &result {
            warn!("opening {kind} failed: {e}");
            self.core.state.write().await.window_error = Some(e.message.clone());
            if e.is_hard_stop() {
                return result.map_err(ChatError::from);
            }
        }

        if kind.is_remote() {
            self.spawn_active();
        }
        result.map_err(ChatError::from)
    }

    /// Close the open window and stop its loop.
    pub async fn close(&self) {
        self.cancel_active();
        let mut st = self.core.state.write().await;
        st.open = None;
        st.window_error = None;
    }

    /// Re-mark the open channel as seen (e.g. when the window regains
    /// focus).
    pub async fn mark_seen(&self, kind: ChannelKind) {
        let mut st = self.core.state.write().await;
        mark_seen_locked(&mut st, &self.core.cursors, self.core.identity.admin, kind);
    }

    /// Post a message to the open group/admins window. Blank input and
    /// non-stream windows are no-ops; a second send while one is in flight
    /// is refused.
    pub async fn send_message(&self, text: &str) -> Result<(), ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let kind = match self.core.state.read().await.open {
            Some(kind) if kind.is_stream() => kind,
            _ => return Ok(()),
        };

        self.core
            .guarded_send(ChatSendRequest::message(kind, text))
            .await?;
        Ok(())
    }

    /// Append a local note. Never touches the network.
    pub async fn add_note(&self, text: &str) {
        let notes = self.core.notes.append(text);
        self.core.state.write().await.notes = notes;
    }

    /// Save the caller's own support message (non-admin side).
    pub async fn support_save(&self, text: &str) -> Result<(), ChatError> {
        let response = self
            .core
            .guarded_send(ChatSendRequest::support_save(text.trim(), None))
            .await?;
        self.core.absorb_ticket(response).await;
        Ok(())
    }

    /// Clear the caller's own support message.
    pub async fn support_delete(&self) -> Result<(), ChatError> {
        let response = self
            .core
            .guarded_send(ChatSendRequest::support_delete(None))
            .await?;
        self.core.absorb_ticket(response).await;
        Ok(())
    }

    /// Select one mailbox from the admin list and load its ticket.
    pub async fn support_select(&self, usuario: &str) -> Result<(), ChatError> {
        if !self.core.identity.admin {
            return Err(ChatError::AdminOnly);
        }
        {
            let mut st = self.core.state.write().await;
            st.support.selected = Some(usuario.to_string());
            st.support.ticket = None;
            st.window_error = None;
        }
        let resp = self
            .core
            .transport
            .list(ChatListQuery::ticket_for(usuario))
            .await
            .map_err(|e| {
                self.core.record_window_error(&e);
                e
            })?;
        let mut st = self.core.state.write().await;
        st.support.ticket = resp.ticket;
        mark_seen_locked(&mut st, &self.core.cursors, true, ChannelKind::Support);
        Ok(())
    }

    /// Return to the admin mailbox list.
    pub async fn support_clear_selection(&self) {
        let mut st = self.core.state.write().await;
        st.support.selected = None;
        st.support.ticket = None;
    }

    /// Save the admin reply on the selected mailbox.
    pub async fn support_admin_save(&self, text: &str) -> Result<(), ChatError> {
        let usuario = self.selected_mailbox().await?;
        let response = self
            .core
            .guarded_send(ChatSendRequest::support_save(text.trim(), Some(usuario)))
            .await?;
        self.core.absorb_ticket(response).await;
        Ok(())
    }

    /// Clear the admin reply on the selected mailbox.
    pub async fn support_admin_delete(&self) -> Result<(), ChatError> {
        let usuario = self.selected_mailbox().await?;
        let response = self
            .core
            .guarded_send(ChatSendRequest::support_delete(Some(usuario)))
            .await?;
        self.core.absorb_ticket(response).await;
        Ok(())
    }

    /// Start (or restart) the background unread watcher.
    pub fn start_unread_watcher(&self) {
        let core = self.core.clone();
        let handle = spawn_poll_loop("unread-watcher", core.intervals.background, move || {
            let core = core.clone();
            async move { core.watcher_tick().await }
        });
        if let Some(old) = self.watcher.lock().unwrap_or_else(|p| p.into_inner()).replace(handle) {
            old.cancel();
        }
    }

    /// Stop every loop this engine owns. Called on logout; also runs on
    /// drop.
    pub fn shutdown(&self) {
        self.cancel_active();
        if let Some(handle) = self.watcher.lock().unwrap_or_else(|p| p.into_inner()).take() {
            handle.cancel();
        }
    }

    async fn selected_mailbox(&self) -> Result<String, ChatError> {
        if !self.core.identity.admin {
            return Err(ChatError::AdminOnly);
        }
        self.core
            .state
            .read()
            .await
            .support
            .selected
            .clone()
            .ok_or(ChatError::NoTicketSelected)
    }

    fn spawn_active(&self) {
        let core = self.core.clone();
        let handle = spawn_poll_loop("active-window", core.intervals.active, move || {
            let core = core.clone();
            async move { core.active_tick().await }
        });
        if let Some(old) = self.active.lock().unwrap_or_else(|p| p.into_inner()).replace(handle) {
            old.cancel();
        }
    }

    fn cancel_active(&self) {
        if let Some(handle) = self.active.lock().unwrap_or_else(|p| p.into_inner()).take() {
            handle.cancel();
        }
    }
}

impl<T: ChatTransport> Drop for ChatEngine<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<T: ChatTransport> std::fmt::Debug for ChatEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("usuario", &self.core.identity.usuario)
            .field("admin", &self.core.identity.admin)
            .finish()
    }
}

impl<T: ChatTransport> EngineCore<T> {
    async fn open_stream(&self, kind: ChannelKind) -> Result<(), TransportError> {
        let since_id = self
            .state
            .read()
            .await
            .stream(kind)
            .map(|s| s.last_id)
            .unwrap_or(0);
        let join_ts = self.cursors.join_ts(kind);

        let resp = self
            .transport
            .list(ChatListQuery::stream(kind, since_id, join_ts, BACKLOG_LIMIT))
            .await?;

        let mut st = self.state.write().await;
        if let Some(stream) = st.stream_mut(kind) {
            stream.absorb(resp.messages, since_id == 0);
            let last = stream.last_id;
            st.raise_known(kind, last);
        }
        mark_seen_locked(&mut st, &self.cursors, self.identity.admin, kind);
        Ok(())
    }

    async fn open_support(&self) -> Result<(), TransportError> {
        if self.identity.admin {
            let resp = self.transport.list(ChatListQuery::ticket_list(TICKET_LIST_LIMIT)).await?;
            let mut st = self.state.write().await;
            st.support.tickets = resp
                .tickets
                .into_iter()
                .map(|t| (t.username.clone(), t))
                .collect();
            st.support.selected = None;
            st.support.ticket = None;
            mark_seen_locked(&mut st, &self.cursors, true, ChannelKind::Support);
        } else {
            let resp = self.transport.list(ChatListQuery::own_ticket()).await?;
            let mut st = self.state.write().await;
            st.support.ticket = resp.ticket;
            mark_seen_locked(&mut st, &self.cursors, false, ChannelKind::Support);
        }
        Ok(())
    }

    /// One pass of the open-window poller.
    async fn active_tick(&self) -> TickOutcome {
        let (open, selected) = {
            let st = self.state.read().await;
            (st.open, st.support.selected.clone())
        };
        let Some(kind) = open else {
            return TickOutcome::Stop;
        };

        let result = match kind {
            ChannelKind::Group | ChannelKind::Admins => self.poll_stream(kind).await,
            ChannelKind::Support => self.poll_support(selected).await,
            ChannelKind::Notes => return TickOutcome::Stop,
        };

        match result {
            Ok(()) => TickOutcome::Continue,
            Err(e) if e.is_hard_stop() => {
                // The backend said forbidden or broken; retrying would only
                // spam it.
                warn!("poll loop for {kind} halting: {e}");
                self.record_window_error(&e);
                TickOutcome::Stop
            }
            Err(e) => {
                debug!("poll tick for {kind} failed transiently: {e}");
                TickOutcome::Continue
            }
        }
    }

    async fn poll_stream(&self, kind: ChannelKind) -> Result<(), TransportError> {
        let since_id = self
            .state
            .read()
            .await
            .stream(kind)
            .map(|s| s.last_id)
            .unwrap_or(0);
        let join_ts = self.cursors.join_ts(kind);

        let resp = self
            .transport
            .list(ChatListQuery::stream(kind, since_id, join_ts, BACKLOG_LIMIT))
            .await?;
        if resp.messages.is_empty() {
            return Ok(());
        }

        let mut st = self.state.write().await;
        if let Some(stream) = st.stream_mut(kind) {
            stream.absorb(resp.messages, false);
            let last = stream.last_id;
            st.raise_known(kind, last);
        }
        // Still looking at the window, so whatever arrived is seen.
        if st.open == Some(kind) {
            mark_seen_locked(&mut st, &self.cursors, self.identity.admin, kind);
        }
        Ok(())
    }

    async fn poll_support(&self, selected: Option<String>) -> Result<(), TransportError> {
        if self.identity.admin {
            let Some(usuario) = selected else {
                // No mailbox selected: keep the list view fresh.
                let resp = self
                    .transport
                    .list(ChatListQuery::ticket_list(TICKET_LIST_LIMIT))
                    .await?;
                let mut st = self.state.write().await;
                st.support.tickets = resp
                    .tickets
                    .into_iter()
                    .map(|t| (t.username.clone(), t))
                    .collect();
                return Ok(());
            };
            let resp = self.transport.list(ChatListQuery::ticket_for(usuario)).await?;
            let mut st = self.state.write().await;
            if st.support.selected.is_some() {
                st.support.ticket = resp.ticket;
            }
        } else {
            let resp = self.transport.list(ChatListQuery::own_ticket()).await?;
            self.state.write().await.support.ticket = resp.ticket;
        }
        Ok(())
    }

    /// One pass of the background unread watcher.
    async fn watcher_tick(&self) -> TickOutcome {
        if let Err(stop) = self.watch_stream(ChannelKind::Group).await {
            return stop;
        }
        if self.identity.admin {
            if let Err(stop) = self.watch_stream(ChannelKind::Admins).await {
                return stop;
            }
        }
        if let Err(stop) = self.watch_support().await {
            return stop;
        }
        TickOutcome::Continue
    }

    async fn watch_stream(&self, kind: ChannelKind) -> Result<(), TickOutcome> {
        let since_id = self.state.read().await.known(kind);
        let join_ts = self.cursors.join_ts(kind);

        match self
            .transport
            .list(ChatListQuery::stream(kind, since_id, join_ts, UNREAD_LIMIT))
            .await
        {
            Ok(resp) => {
                if let Some(last) = resp.messages.last() {
                    let newest = last.id;
                    let mut st = self.state.write().await;
                    st.raise_known(kind, newest);
                    if newest > self.cursors.seen(kind) && st.open != Some(kind) {
                        match kind {
                            ChannelKind::Group => st.unread.group = true,
                            ChannelKind::Admins => st.unread.admins = true,
                            _ => {}
                        }
                    }
                }
                Ok(())
            }
            Err(e) => self.watcher_error(kind, e),
        }
    }

    async fn watch_support(&self) -> Result<(), TickOutcome> {
        if self.identity.admin {
            match self.transport.list(ChatListQuery::ticket_list(TICKET_LIST_LIMIT)).await {
                Ok(resp) => {
                    let mut st = self.state.write().await;
                    st.support.tickets = resp
                        .tickets
                        .into_iter()
                        .map(|t| (t.username.clone(), t))
                        .collect();
                    let newest = max_last_event(st.support.tickets.values());
                    if newest > self.cursors.support_seen(SupportSide::Admin)
                        && st.open != Some(ChannelKind::Support)
                    {
                        st.unread.support = true;
                    }
                    Ok(())
                }
                Err(e) => self.watcher_error(ChannelKind::Support, e),
            }
        } else {
            match self.transport.list(ChatListQuery::own_ticket()).await {
                Ok(resp) => {
                    let mut st = self.state.write().await;
                    let newest = resp.ticket.as_ref().map(|t| t.admin_event_id).unwrap_or(0);
                    st.support.ticket = resp.ticket;
                    if newest > self.cursors.support_seen(SupportSide::User)
                        && st.open != Some(ChannelKind::Support)
                    {
                        st.unread.support = true;
                    }
                    Ok(())
                }
                Err(e) => self.watcher_error(ChannelKind::Support, e),
            }
        }
    }

    fn watcher_error(&self, kind: ChannelKind, e: TransportError) -> Result<(), TickOutcome> {
        if e.is_hard_stop() {
            warn!("unread watcher halting on {kind}: {e}");
            Err(TickOutcome::Stop)
        } else {
            debug!("unread check for {kind} failed transiently: {e}");
            Ok(())
        }
    }

    /// Run a send with the duplicate-submission gate held.
    async fn guarded_send(
        &self,
        request: ChatSendRequest,
    ) -> Result<ChatSendResponse, ChatError> {
        {
            let mut st = self.state.write().await;
            if st.sending {
                return Err(ChatError::Busy);
            }
            st.sending = true;
            st.window_error = None;
        }

        let result = self.transport.send(request).await;
        let mut st = self.state.write().await;
        st.sending = false;
        match result {
            Ok(resp) => Ok(resp),
            Err(e) => {
                st.window_error = Some(e.message.clone());
                Err(ChatError::Transport(e))
            }
        }
    }

    /// Take the ticket echoed by a support mutation and mark the side seen.
    async fn absorb_ticket(&self, response: ChatSendResponse) {
        let mut st = self.state.write().await;
        if let Some(ticket) = response.ticket {
            if self.identity.admin {
                st.support.tickets.insert(ticket.username.clone(), ticket.clone());
            }
            st.support.ticket = Some(ticket);
        }
        mark_seen_locked(&mut st, &self.cursors, self.identity.admin, ChannelKind::Support);
    }

    fn record_window_error(&self, e: &TransportError) {
        let message = e.message.clone();
        // Best-effort: the state lock is only ever held briefly.
        if let Ok(mut st) = self.state.try_write() {
            st.window_error = Some(message);
        }
    }
}

/// Write the seen marker for a channel and clear its badge.
fn mark_seen_locked(
    st: &mut ChatState,
    cursors: &CursorStore,
    admin: bool,
    kind: ChannelKind,
) {
    match kind {
        ChannelKind::Group | ChannelKind::Admins => {
            if let Some(stream) = st.stream(kind) {
                cursors.mark_seen(kind, stream.last_id);
            }
            match kind {
                ChannelKind::Group => st.unread.group = false,
                ChannelKind::Admins => st.unread.admins = false,
                _ => {}
            }
        }
        ChannelKind::Support => {
            if admin {
                cursors.mark_support_seen(
                    SupportSide::Admin,
                    max_last_event(st.support.tickets.values()),
                );
            } else {
                let newest = st
                    .support
                    .ticket
                    .as_ref()
                    .map(|t| t.admin_event_id)
                    .unwrap_or(0);
                cursors.mark_support_seen(SupportSide::User, newest);
            }
            st.unread.support = false;
        }
        ChannelKind::Notes => {}
    }
}
