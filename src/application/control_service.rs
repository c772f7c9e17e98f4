//! Control Service - 界面与设备之间的控制编排
//!
//! 每次用户设值:
//! 1. 在快照锁内更新本地值并领取序号票（立即反馈给界面）
//! 2. 并发执行持久化（write-through）与设备命令，两者互不依赖
//! 3. 结果按序号票判定：过期的结果直接丢弃，不回写、不提示
//!
//! 设备命令失败不会回滚本地值，只发布一条非阻塞提示。

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

use crate::application::error::ApplicationError;
use crate::application::ports::{
    CommandResult, DeviceControlPort, PreferenceStorePort, StoreError,
};
use crate::application::sequencer::{ControlSequencer, Ticket};
use crate::domain::{
    Control, ControlCommand, Level, PlayingStates, PreferenceField, PreferenceKey,
    PreferenceRecord, SoundCatalog, SoundId,
};
use crate::infrastructure::events::{ControlNotice, NoticePublisher};

/// 控制服务配置
#[derive(Debug, Clone)]
pub struct ControlServiceConfig {
    /// PlaySound 使用的音量
    pub default_volume: Level,
    /// 开始播放一个音效时是否清除其他音效的播放标志
    pub exclusive_playback: bool,
}

impl Default for ControlServiceConfig {
    fn default() -> Self {
        Self {
            default_volume: Level::DEFAULT,
            exclusive_playback: false,
        }
    }
}

/// 持久化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Saved,
    /// 已有更新的值，跳过本次写入
    Superseded,
    Failed(StoreError),
}

impl Persistence {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// 一次设值的结果
#[derive(Debug, Clone)]
pub struct ControlOutcome<T> {
    /// 本地已生效的值
    pub applied: T,
    pub persisted: Persistence,
    pub device: CommandResult,
    /// 结果返回时已有更新的设值，调用方应忽略本结果
    pub stale: bool,
}

/// 启动同步报告
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub brightness: CommandResult,
    pub noise_suppression: CommandResult,
    /// 没有音效处于播放状态时为 None
    pub sound: Option<CommandResult>,
}

impl SyncReport {
    pub fn all_ok(&self) -> bool {
        self.brightness.is_ok()
            && self.noise_suppression.is_ok()
            && self.sound.as_ref().map(|r| r.is_ok()).unwrap_or(true)
    }
}

/// 控制服务
pub struct ControlService {
    device: Arc<dyn DeviceControlPort>,
    store: Arc<dyn PreferenceStorePort>,
    notices: Arc<NoticePublisher>,
    sequencer: ControlSequencer,
    snapshot: RwLock<PreferenceRecord>,
    /// 每个偏好键一把写锁，保证同键写入串行
    write_locks: DashMap<PreferenceKey, Arc<Mutex<()>>>,
    config: ControlServiceConfig,
}

impl ControlService {
    pub fn new(
        device: Arc<dyn DeviceControlPort>,
        store: Arc<dyn PreferenceStorePort>,
        notices: Arc<NoticePublisher>,
        config: ControlServiceConfig,
    ) -> Self {
        Self {
            device,
            store,
            notices,
            sequencer: ControlSequencer::new(),
            snapshot: RwLock::new(PreferenceRecord::defaults()),
            write_locks: DashMap::new(),
            config,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 从存储恢复快照（启动时调用一次）
    pub async fn restore(&self) -> PreferenceRecord {
        let record = self.store.load().await;
        *self.snapshot.write().await = record.clone();
        tracing::info!(
            brightness = %record.brightness,
            noise_suppression = %record.noise_suppression,
            playing = record.playing_states.playing().len(),
            "Preferences restored"
        );
        record
    }

    /// 当前生效值的快照
    pub async fn snapshot(&self) -> PreferenceRecord {
        self.snapshot.read().await.clone()
    }

    /// 订阅提示
    pub fn subscribe(&self) -> broadcast::Receiver<ControlNotice> {
        self.notices.subscribe()
    }

    /// 设置亮度
    pub async fn set_brightness(&self, level: Level) -> ControlOutcome<Level> {
        let ticket = {
            let mut snapshot = self.snapshot.write().await;
            snapshot.brightness = level;
            self.sequencer.issue(Control::Brightness)
        };
        self.apply(
            ticket,
            level,
            PreferenceField::Brightness(level),
            ControlCommand::SetBrightness { level },
        )
        .await
    }

    /// 设置降噪强度
    pub async fn set_noise_suppression(&self, level: Level) -> ControlOutcome<Level> {
        let ticket = {
            let mut snapshot = self.snapshot.write().await;
            snapshot.noise_suppression = level;
            self.sequencer.issue(Control::NoiseSuppression)
        };
        self.apply(
            ticket,
            level,
            PreferenceField::NoiseSuppression(level),
            ControlCommand::SetNoiseSuppression { level },
        )
        .await
    }

    /// 切换音效播放状态
    pub async fn toggle_sound(
        &self,
        sound: &SoundId,
    ) -> Result<ControlOutcome<PlayingStates>, ApplicationError> {
        if !SoundCatalog::contains(sound) {
            return Err(ApplicationError::unknown_sound(sound.as_str()));
        }

        let (ticket, states, playing) = {
            let mut snapshot = self.snapshot.write().await;
            let playing = snapshot.playing_states.toggle(sound);
            if playing && self.config.exclusive_playback {
                snapshot.playing_states.clear_except(sound);
            }
            (
                self.sequencer.issue(Control::Sound),
                snapshot.playing_states.clone(),
                playing,
            )
        };

        // 设备只有一个全局 stop：关掉一个音效后，若仍有标记为播放的音效，
        // 按目录顺序续播第一个（与 sync_to_device 同一规则）
        let command = if playing {
            ControlCommand::PlaySound {
                sound: sound.clone(),
                volume: self.config.default_volume,
            }
        } else {
            match states.playing().into_iter().next() {
                Some(remaining) => ControlCommand::PlaySound {
                    sound: remaining,
                    volume: self.config.default_volume,
                },
                None => ControlCommand::StopSound,
            }
        };

        Ok(self
            .apply(
                ticket,
                states.clone(),
                PreferenceField::PlayingStates(states),
                command,
            )
            .await)
    }

    /// 停止全部音效
    pub async fn stop_all(&self) -> ControlOutcome<PlayingStates> {
        let (ticket, states) = {
            let mut snapshot = self.snapshot.write().await;
            snapshot.playing_states.clear();
            (
                self.sequencer.issue(Control::Sound),
                snapshot.playing_states.clone(),
            )
        };
        self.apply(
            ticket,
            states.clone(),
            PreferenceField::PlayingStates(states),
            ControlCommand::StopSound,
        )
        .await
    }

    /// 查询设备状态
    pub async fn device_status(&self) -> CommandResult {
        self.device.send(ControlCommand::GetStatus).await
    }

    /// 设备是否在线
    pub async fn device_available(&self) -> bool {
        self.device.health_check().await
    }

    /// 把恢复出的本地值重新下发到设备
    pub async fn sync_to_device(&self) -> SyncReport {
        let record = self.snapshot().await;

        let brightness = self
            .dispatch(ControlCommand::SetBrightness {
                level: record.brightness,
            })
            .await;
        let noise_suppression = self
            .dispatch(ControlCommand::SetNoiseSuppression {
                level: record.noise_suppression,
            })
            .await;
        let sound = match record.playing_states.playing().into_iter().next() {
            Some(sound) => Some(
                self.dispatch(ControlCommand::PlaySound {
                    sound,
                    volume: self.config.default_volume,
                })
                .await,
            ),
            None => None,
        };

        let report = SyncReport {
            brightness,
            noise_suppression,
            sound,
        };
        tracing::info!(all_ok = report.all_ok(), "Preferences synced to device");
        report
    }

    /// 下发命令，失败时提示（不涉及快照与存储）
    async fn dispatch(&self, command: ControlCommand) -> CommandResult {
        let control = command.control();
        let result = self.device.send(command).await;
        if let Err(failure) = &result {
            self.notices
                .publish_command_failed(control, &failure.to_string());
        }
        result
    }

    async fn apply<T>(
        &self,
        ticket: Ticket,
        applied: T,
        field: PreferenceField,
        command: ControlCommand,
    ) -> ControlOutcome<T> {
        let key = field.key();
        let (persisted, device) =
            tokio::join!(self.persist(&ticket, field), self.device.send(command));

        let stale = !self.sequencer.is_current(&ticket);
        if stale {
            tracing::debug!(
                control = %ticket.control,
                generation = ticket.generation,
                latest = self.sequencer.latest(ticket.control),
                "Discarding stale control result"
            );
        } else {
            if let Err(failure) = &device {
                tracing::warn!(
                    control = %ticket.control,
                    kind = failure.kind(),
                    error = %failure,
                    "Device command failed"
                );
                self.notices
                    .publish_command_failed(ticket.control, &failure.to_string());
            }
            if let Persistence::Failed(e) = &persisted {
                self.notices.publish_preference_not_saved(key, &e.to_string());
            }
        }

        ControlOutcome {
            applied,
            persisted,
            device,
            stale,
        }
    }

    /// 在该键的写锁内持久化；拿到锁时票已过期则跳过
    async fn persist(&self, ticket: &Ticket, field: PreferenceField) -> Persistence {
        let key = field.key();
        let lock = self
            .write_locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if !self.sequencer.is_current(ticket) {
            return Persistence::Superseded;
        }

        match self.store.save_field(field).await {
            Ok(()) => Persistence::Saved,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to persist preference");
                Persistence::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CommandFailure;
    use crate::infrastructure::adapters::{
        FakeDeviceClient, HttpDeviceClient, HttpDeviceClientConfig,
    };
    use crate::infrastructure::http::{spawn_stub_device, StubDeviceConfig};
    use crate::infrastructure::memory::InMemoryPreferenceStore;
    use std::time::Duration;

    struct Fixture {
        device: Arc<FakeDeviceClient>,
        store: Arc<InMemoryPreferenceStore>,
        service: Arc<ControlService>,
    }

    fn fixture(config: ControlServiceConfig) -> Fixture {
        let device = Arc::new(FakeDeviceClient::new());
        let store = Arc::new(InMemoryPreferenceStore::new());
        let service = ControlService::new(
            device.clone(),
            store.clone(),
            NoticePublisher::new().arc(),
            config,
        )
        .arc();
        Fixture {
            device,
            store,
            service,
        }
    }

    fn brightness(level: i64) -> ControlCommand {
        ControlCommand::SetBrightness {
            level: Level::clamped(level),
        }
    }

    #[tokio::test]
    async fn test_set_brightness_applies_persists_and_sends() {
        let f = fixture(ControlServiceConfig::default());

        let outcome = f.service.set_brightness(Level::clamped(73)).await;

        assert_eq!(outcome.applied.value(), 73);
        assert!(outcome.persisted.is_saved());
        assert!(outcome.device.is_ok());
        assert!(!outcome.stale);
        assert_eq!(f.service.snapshot().await.brightness.value(), 73);
        assert_eq!(f.store.load().await.brightness.value(), 73);
        assert_eq!(f.device.sent(), vec![brightness(73)]);
    }

    #[tokio::test]
    async fn test_slow_stale_response_does_not_revert_newer_value() {
        let f = fixture(ControlServiceConfig::default());
        f.device
            .set_delay(brightness(20), Duration::from_millis(200));

        let first = {
            let service = f.service.clone();
            tokio::spawn(async move { service.set_brightness(Level::clamped(20)).await })
        };
        // 确保第一条先发出
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = f.service.set_brightness(Level::clamped(80)).await;
        let first = first.await.unwrap();

        assert!(!second.stale);
        assert!(first.stale);
        // 设备端按完成顺序：80 先完成，20 后完成
        assert_eq!(f.device.sent(), vec![brightness(80), brightness(20)]);
        assert_eq!(f.service.snapshot().await.brightness.value(), 80);
        assert_eq!(f.store.load().await.brightness.value(), 80);
    }

    #[tokio::test]
    async fn test_device_failure_keeps_local_value_and_notifies() {
        let f = fixture(ControlServiceConfig::default());
        let mut notices = f.service.subscribe();
        f.device.fail_with(Some(CommandFailure::Timeout));

        let outcome = f.service.set_noise_suppression(Level::clamped(30)).await;

        assert_eq!(outcome.device, Err(CommandFailure::Timeout));
        assert!(outcome.persisted.is_saved());
        assert_eq!(f.service.snapshot().await.noise_suppression.value(), 30);
        match notices.recv().await.unwrap() {
            ControlNotice::CommandFailed { control, .. } => {
                assert_eq!(control, Control::NoiseSuppression)
            }
            other => panic!("unexpected notice: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced_without_blocking() {
        let f = fixture(ControlServiceConfig::default());
        let mut notices = f.service.subscribe();
        f.store.fail_writes(true);

        let outcome = f.service.set_brightness(Level::clamped(10)).await;

        assert!(matches!(outcome.persisted, Persistence::Failed(StoreError::WriteFailed(_))));
        assert!(outcome.device.is_ok());
        assert_eq!(f.service.snapshot().await.brightness.value(), 10);
        assert!(matches!(
            notices.recv().await.unwrap(),
            ControlNotice::PreferenceNotSaved {
                key: PreferenceKey::Brightness,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_toggle_sounds_independently_by_default() {
        let f = fixture(ControlServiceConfig::default());
        let ocean = SoundCatalog::find_by_name("Ocean Waves").unwrap().sound_id();
        let white = SoundCatalog::find_by_name("White Noise").unwrap().sound_id();

        f.service.toggle_sound(&ocean).await.unwrap();
        let outcome = f.service.toggle_sound(&white).await.unwrap();

        assert!(outcome.applied.is_playing(&ocean));
        assert!(outcome.applied.is_playing(&white));
        let stored = f.store.load().await.playing_states;
        assert!(stored.is_playing(&ocean) && stored.is_playing(&white));
        assert_eq!(
            f.device.sent().last(),
            Some(&ControlCommand::PlaySound {
                sound: white,
                volume: Level::DEFAULT,
            })
        );
    }

    #[tokio::test]
    async fn test_exclusive_playback_clears_other_sounds() {
        let f = fixture(ControlServiceConfig {
            exclusive_playback: true,
            ..Default::default()
        });
        let ocean = SoundId::new("2");
        let white = SoundId::new("1");

        f.service.toggle_sound(&ocean).await.unwrap();
        let outcome = f.service.toggle_sound(&white).await.unwrap();

        assert!(!outcome.applied.is_playing(&ocean));
        assert!(outcome.applied.is_playing(&white));
    }

    #[tokio::test]
    async fn test_toggle_off_sends_stop_and_unknown_sound_is_rejected() {
        let f = fixture(ControlServiceConfig::default());
        let rain = SoundId::new("3");

        f.service.toggle_sound(&rain).await.unwrap();
        let outcome = f.service.toggle_sound(&rain).await.unwrap();
        assert!(!outcome.applied.is_playing(&rain));
        assert_eq!(f.device.sent().last(), Some(&ControlCommand::StopSound));

        let err = f.service.toggle_sound(&SoundId::new("99")).await.unwrap_err();
        assert_eq!(err, ApplicationError::UnknownSound("99".to_string()));
    }

    #[tokio::test]
    async fn test_toggle_off_resumes_remaining_flagged_sound() {
        let f = fixture(ControlServiceConfig::default());
        let white = SoundId::new("1");
        let ocean = SoundId::new("2");

        f.service.toggle_sound(&white).await.unwrap();
        f.service.toggle_sound(&ocean).await.unwrap();
        let outcome = f.service.toggle_sound(&ocean).await.unwrap();

        assert!(outcome.applied.is_playing(&white));
        assert!(!outcome.applied.is_playing(&ocean));
        assert_eq!(
            f.device.sent().last(),
            Some(&ControlCommand::PlaySound {
                sound: white.clone(),
                volume: Level::DEFAULT,
            })
        );

        f.service.toggle_sound(&white).await.unwrap();
        assert_eq!(f.device.sent().last(), Some(&ControlCommand::StopSound));
    }

    #[tokio::test]
    async fn test_device_keeps_playing_flagged_sound_after_other_is_turned_off() {
        let stub = spawn_stub_device(StubDeviceConfig::default()).await.unwrap();
        let device = Arc::new(
            HttpDeviceClient::new(HttpDeviceClientConfig::new(stub.base_url())).unwrap(),
        );
        let service = ControlService::new(
            device,
            Arc::new(InMemoryPreferenceStore::new()),
            NoticePublisher::new().arc(),
            ControlServiceConfig::default(),
        );
        let white = SoundId::new("1");
        let ocean = SoundId::new("2");

        service.toggle_sound(&white).await.unwrap();
        service.toggle_sound(&ocean).await.unwrap();
        service.toggle_sound(&ocean).await.unwrap();

        assert!(service.snapshot().await.playing_states.is_playing(&white));
        let now_playing = stub.state().now_playing.expect("device should still be playing");
        assert_eq!(now_playing.sound, white);
    }

    #[tokio::test]
    async fn test_restore_then_sync_to_device() {
        let f = fixture(ControlServiceConfig::default());
        f.store
            .save_field(PreferenceField::Brightness(Level::clamped(40)))
            .await
            .unwrap();
        let mut states = PlayingStates::new();
        states.set(SoundId::new("7"), true);
        f.store
            .save_field(PreferenceField::PlayingStates(states))
            .await
            .unwrap();

        let restored = f.service.restore().await;
        assert_eq!(restored.brightness.value(), 40);
        assert_eq!(restored.noise_suppression, Level::DEFAULT);

        let report = f.service.sync_to_device().await;
        assert!(report.all_ok());
        assert_eq!(
            f.device.sent(),
            vec![
                brightness(40),
                ControlCommand::SetNoiseSuppression {
                    level: Level::DEFAULT
                },
                ControlCommand::PlaySound {
                    sound: SoundId::new("7"),
                    volume: Level::DEFAULT,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_stop_all_clears_flags() {
        let f = fixture(ControlServiceConfig::default());
        f.service.toggle_sound(&SoundId::new("1")).await.unwrap();
        f.service.toggle_sound(&SoundId::new("4")).await.unwrap();

        let outcome = f.service.stop_all().await;

        assert!(!outcome.applied.any_playing());
        assert!(!f.store.load().await.playing_states.any_playing());
        assert_eq!(f.device.sent().last(), Some(&ControlCommand::StopSound));
    }
}
