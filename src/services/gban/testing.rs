//! In-memory gateway and store used by the gban service tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, CreateEmbed, GuildId, UserId};

use crate::bot::error::Error;
use crate::db::models::{GlobalBan, ModAction, ModlogEntry, RaterAssignment, ServerClass};
use crate::db::GbanStore;
use crate::services::gban::gateway::{GuildGateway, GuildInfo};

pub const BOT: UserId = UserId::new(1);

/// A remote call the fake gateway received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ban(GuildId, UserId),
    Unban(GuildId, UserId),
    Bans(GuildId),
    UserLookup(UserId),
    Embed(ChannelId),
}

#[derive(Default)]
struct GatewayState {
    guilds: Vec<GuildInfo>,
    bans: HashMap<GuildId, HashSet<UserId>>,
    failing: HashSet<GuildId>,
    failing_embeds: bool,
    unknown_users: HashSet<UserId>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<GatewayState>,
}

impl FakeGateway {
    pub fn with_guilds(guilds: &[(u64, &str)]) -> Self {
        let gateway = Self::default();
        gateway.state.lock().unwrap().guilds = guilds
            .iter()
            .map(|(id, name)| GuildInfo {
                id: GuildId::new(*id),
                name: name.to_string(),
            })
            .collect();
        gateway
    }

    /// Make every ban/unban in this guild fail
    pub fn fail_in(&self, guild: u64) {
        self.state.lock().unwrap().failing.insert(GuildId::new(guild));
    }

    pub fn fail_embeds(&self) {
        self.state.lock().unwrap().failing_embeds = true;
    }

    pub fn unknown_user(&self, user: u64) {
        self.state.lock().unwrap().unknown_users.insert(UserId::new(user));
    }

    pub fn set_banned(&self, guild: u64, user: u64) {
        self.state
            .lock()
            .unwrap()
            .bans
            .entry(GuildId::new(guild))
            .or_default()
            .insert(UserId::new(user));
    }

    pub fn is_banned(&self, guild: u64, user: u64) -> bool {
        self.state
            .lock()
            .unwrap()
            .bans
            .get(&GuildId::new(guild))
            .map(|b| b.contains(&UserId::new(user)))
            .unwrap_or(false)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change state in Discord
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Ban(..) | Call::Unban(..) | Call::Embed(_)))
            .collect()
    }
}

#[async_trait]
impl GuildGateway for FakeGateway {
    fn bot_id(&self) -> UserId {
        BOT
    }

    async fn guilds(&self) -> Result<Vec<GuildInfo>, Error> {
        Ok(self.state.lock().unwrap().guilds.clone())
    }

    async fn ban(&self, guild_id: GuildId, user_id: UserId, _reason: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Ban(guild_id, user_id));
        if state.failing.contains(&guild_id) {
            return Err(Error::custom("Missing Permissions"));
        }
        state.bans.entry(guild_id).or_default().insert(user_id);
        Ok(())
    }

    async fn unban(&self, guild_id: GuildId, user_id: UserId, _reason: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Unban(guild_id, user_id));
        if state.failing.contains(&guild_id) {
            return Err(Error::custom("Missing Permissions"));
        }
        state.bans.entry(guild_id).or_default().remove(&user_id);
        Ok(())
    }

    async fn bans(&self, guild_id: GuildId) -> Result<HashSet<UserId>, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Bans(guild_id));
        Ok(state.bans.get(&guild_id).cloned().unwrap_or_default())
    }

    async fn user_exists(&self, user_id: UserId) -> Result<bool, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UserLookup(user_id));
        Ok(!state.unknown_users.contains(&user_id))
    }

    async fn send_embed(&self, channel_id: ChannelId, _embed: CreateEmbed) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Embed(channel_id));
        if state.failing_embeds {
            return Err(Error::custom("Cannot send messages in this channel"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct StoreState {
    servers: HashMap<GuildId, ServerClass>,
    log_channels: HashMap<GuildId, ChannelId>,
    gbans: BTreeMap<String, GlobalBan>,
    modlog: Vec<ModlogEntry>,
    raters: Vec<RaterAssignment>,
    writes: usize,
    fail_writes: bool,
}

#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
}

impl FakeStore {
    pub fn set_class(&self, guild: u64, class: ServerClass) {
        self.state.lock().unwrap().servers.insert(GuildId::new(guild), class);
    }

    pub fn class(&self, guild: u64) -> Option<ServerClass> {
        self.state.lock().unwrap().servers.get(&GuildId::new(guild)).copied()
    }

    pub fn set_log_channel_for(&self, guild: u64, channel: u64) {
        self.state
            .lock()
            .unwrap()
            .log_channels
            .insert(GuildId::new(guild), ChannelId::new(channel));
    }

    pub fn seed_gban(&self, target: u64, reason: &str, date: DateTime<Utc>, unbanned: bool) {
        let mut row = GlobalBan::new(UserId::new(target), reason, date);
        row.unbanned = unbanned;
        self.state.lock().unwrap().gbans.insert(row.target.clone(), row);
    }

    pub fn gban(&self, target: u64) -> Option<GlobalBan> {
        self.state
            .lock()
            .unwrap()
            .gbans
            .get(&target.to_string())
            .cloned()
    }

    pub fn gban_count(&self) -> usize {
        self.state.lock().unwrap().gbans.len()
    }

    /// Append a modlog ban as if the bot had issued it at `date`
    pub fn seed_bot_ban(&self, guild: u64, target: u64, reason: &str, date: DateTime<Utc>) {
        self.state.lock().unwrap().modlog.push(ModlogEntry::new(
            GuildId::new(guild),
            BOT,
            UserId::new(target),
            ModAction::Ban,
            reason,
            date,
        ));
    }

    pub fn seed_rater(&self, user: u64, channel: &str, meta: &str) {
        self.state.lock().unwrap().raters.push(RaterAssignment {
            userid: user.to_string(),
            channelid: channel.to_string(),
            meta: meta.to_string(),
        });
    }

    pub fn modlog(&self) -> Vec<ModlogEntry> {
        self.state.lock().unwrap().modlog.clone()
    }

    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    /// Make every subsequent write fail like a lost database connection
    pub fn fail_writes(&self) {
        self.state.lock().unwrap().fail_writes = true;
    }

    fn write(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(Error::Database(sqlx::Error::PoolClosed));
        }
        state.writes += 1;
        Ok(state)
    }
}

fn newest_first(mut entries: Vec<ModlogEntry>) -> Vec<ModlogEntry> {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

#[async_trait]
impl GbanStore for FakeStore {
    async fn server_class(&self, guild_id: GuildId) -> Result<Option<ServerClass>, Error> {
        Ok(self.state.lock().unwrap().servers.get(&guild_id).copied())
    }

    async fn register_server(&self, guild_id: GuildId, class: ServerClass) -> Result<bool, Error> {
        let mut state = self.write()?;
        if state.servers.contains_key(&guild_id) {
            return Ok(false);
        }
        state.servers.insert(guild_id, class);
        Ok(true)
    }

    async fn raise_server_class(
        &self,
        guild_id: GuildId,
        class: ServerClass,
    ) -> Result<bool, Error> {
        let mut state = self.write()?;
        match state.servers.get(&guild_id) {
            Some(current) if *current >= class => Ok(false),
            _ => {
                state.servers.insert(guild_id, class);
                Ok(true)
            }
        }
    }

    async fn set_server_class(&self, guild_id: GuildId, class: ServerClass) -> Result<(), Error> {
        self.write()?.servers.insert(guild_id, class);
        Ok(())
    }

    async fn remove_server(&self, guild_id: GuildId) -> Result<bool, Error> {
        Ok(self.write()?.servers.remove(&guild_id).is_some())
    }

    async fn log_channel(&self, guild_id: GuildId) -> Result<Option<ChannelId>, Error> {
        Ok(self.state.lock().unwrap().log_channels.get(&guild_id).copied())
    }

    async fn set_log_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), Error> {
        self.write()?.log_channels.insert(guild_id, channel_id);
        Ok(())
    }

    async fn global_ban(&self, target: UserId) -> Result<Option<GlobalBan>, Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .gbans
            .get(&target.to_string())
            .cloned())
    }

    async fn active_global_bans(&self) -> Result<Vec<GlobalBan>, Error> {
        let mut rows: Vec<GlobalBan> = self
            .state
            .lock()
            .unwrap()
            .gbans
            .values()
            .filter(|row| row.is_active())
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.date);
        Ok(rows)
    }

    async fn upsert_global_ban(
        &self,
        target: UserId,
        reason: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let row = GlobalBan::new(target, reason, issued_at);
        self.write()?.gbans.insert(row.target.clone(), row);
        Ok(())
    }

    async fn upsert_global_bans(&self, rows: &[GlobalBan]) -> Result<u64, Error> {
        let mut state = self.write()?;
        for row in rows {
            let mut row = row.clone();
            row.unbanned = false;
            state.gbans.insert(row.target.clone(), row);
        }
        Ok(rows.len() as u64)
    }

    async fn mark_unbanned(&self, targets: &[UserId]) -> Result<u64, Error> {
        let mut state = self.write()?;
        let mut updated = 0;
        for target in targets {
            if let Some(row) = state.gbans.get_mut(&target.to_string()) {
                row.unbanned = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn record_action(&self, entry: &ModlogEntry) -> Result<(), Error> {
        self.write()?.modlog.push(entry.clone());
        Ok(())
    }

    async fn bans_by_executor(
        &self,
        executor: UserId,
        target: UserId,
    ) -> Result<Vec<ModlogEntry>, Error> {
        self.bans_by_executor_for(executor, &[target]).await
    }

    async fn bans_by_executor_for(
        &self,
        executor: UserId,
        targets: &[UserId],
    ) -> Result<Vec<ModlogEntry>, Error> {
        let executor = executor.to_string();
        let targets: HashSet<String> = targets.iter().map(|t| t.to_string()).collect();
        let entries = self
            .state
            .lock()
            .unwrap()
            .modlog
            .iter()
            .filter(|e| e.is(ModAction::Ban) && e.executor == executor)
            .filter(|e| targets.contains(&e.target))
            .cloned()
            .collect();
        Ok(newest_first(entries))
    }

    async fn channel_raters(&self, channel_id: ChannelId) -> Result<Vec<String>, Error> {
        let channel = channel_id.to_string();
        let mut users: Vec<String> = self
            .state
            .lock()
            .unwrap()
            .raters
            .iter()
            .filter(|r| r.channelid == channel)
            .map(|r| r.userid.clone())
            .collect();
        users.sort();
        Ok(users)
    }

    async fn remove_rater(&self, user: UserId) -> Result<Vec<RaterAssignment>, Error> {
        let user = user.to_string();
        let mut state = self.write()?;
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.raters)
            .into_iter()
            .partition(|r| r.userid == user);
        state.raters = kept;
        Ok(removed)
    }
}
