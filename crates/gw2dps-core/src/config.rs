//! Meter configuration.
//!
//! Defaults match the current game client. A TOML file can replace any of them:
//!
//! ```toml
//! [process]
//! image_name = "Gw2.exe"
//!
//! [[target]]
//! kind = "regular"
//! base = 0x13EB0B4          # relative to the image base
//! offsets = "0x34, 0x150, 0x8"
//!
//! [combat]
//! flag_address = 0x171654C  # absolute
//! sentinel_address = 0x1715970
//! sentinel_pattern = 1065353216
//!
//! [timing]
//! tick_ms = 250
//!
//! [display]
//! background = "#222222"
//! ```
//!
//! Every key is optional. A `[[target]]` list replaces the default list as a
//! whole.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::display::Colour;
use crate::error::{Error, Result};
use crate::memory::GAME_IMAGE_NAME;
use crate::memory::layout::{combat, target, timing};
use crate::offset::OffsetChain;
use crate::target::{TargetCandidate, TargetKind};

pub const DEFAULT_CONFIG_FILE: &str = "gw2dps.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Executable image to attach to; also the module whose base anchors the
    /// target trails
    pub image_name: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            image_name: GAME_IMAGE_NAME.to_string(),
        }
    }
}

/// One target trail as written in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    #[serde(default)]
    pub kind: TargetKind,
    /// Start of the trail, relative to the image base
    pub base: u64,
    pub offsets: OffsetChain,
}

impl TargetSpec {
    pub fn new(kind: TargetKind, base: u64, offsets: OffsetChain) -> Self {
        Self {
            kind,
            base,
            offsets,
        }
    }

    pub fn regular() -> Self {
        Self::new(
            TargetKind::Regular,
            target::REGULAR_BASE,
            OffsetChain::from(target::REGULAR_OFFSETS),
        )
    }
}

/// Combat flag cells (absolute addresses)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub flag_address: u64,
    pub sentinel_address: u64,
    pub sentinel_pattern: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            flag_address: combat::FLAG_ADDRESS,
            sentinel_address: combat::SENTINEL_ADDRESS,
            sentinel_pattern: combat::IN_COMBAT_PATTERN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_ms: u64,
    pub instant_window_secs: u32,
    pub sustained_window_secs: u32,
    pub peak_freeze_secs: u32,
    pub average_freeze_secs: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: timing::TICK_INTERVAL_MS,
            instant_window_secs: timing::INSTANT_WINDOW_SECS,
            sustained_window_secs: timing::SUSTAINED_WINDOW_SECS,
            peak_freeze_secs: timing::PEAK_FREEZE_SECS,
            average_freeze_secs: timing::AVERAGE_FREEZE_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub background: Colour,
}

/// Complete meter configuration, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    pub process: ProcessConfig,
    /// Target trails in priority order
    #[serde(rename = "target")]
    pub targets: Vec<TargetSpec>,
    pub combat: CombatConfig,
    pub timing: TimingConfig,
    pub display: DisplayConfig,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            process: ProcessConfig::default(),
            targets: vec![TargetSpec::regular()],
            combat: CombatConfig::default(),
            timing: TimingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl MeterConfig {
    pub fn builder() -> MeterConfigBuilder {
        MeterConfigBuilder::default()
    }

    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            "Loaded configuration from {} ({} target trails)",
            path.display(),
            config.targets.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.process.image_name.trim().is_empty() {
            return Err(Error::InvalidConfig("process.image_name is empty".into()));
        }
        if self.targets.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one [[target]] trail is required".into(),
            ));
        }
        let timing = &self.timing;
        if timing.tick_ms == 0 {
            return Err(Error::InvalidConfig("timing.tick_ms must be positive".into()));
        }
        if timing.instant_window_secs == 0 || timing.sustained_window_secs == 0 {
            return Err(Error::InvalidConfig(
                "rate windows must be at least one second".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timing.tick_ms)
    }

    /// Target candidates with their bases moved into the attached image
    pub fn candidates(&self, module_base: u64) -> Vec<TargetCandidate> {
        self.targets
            .iter()
            .map(|spec| {
                TargetCandidate::new(
                    spec.kind,
                    module_base.wrapping_add(spec.base),
                    spec.offsets.clone(),
                )
            })
            .collect()
    }
}

/// Builder for MeterConfig
#[derive(Debug, Clone, Default)]
pub struct MeterConfigBuilder {
    base: Option<MeterConfig>,
    image_name: Option<String>,
    targets: Option<Vec<TargetSpec>>,
    combat: Option<CombatConfig>,
    tick_ms: Option<u64>,
    background: Option<Colour>,
}

impl MeterConfigBuilder {
    /// Start from an existing configuration instead of the defaults
    pub fn from_config(config: MeterConfig) -> Self {
        Self {
            base: Some(config),
            ..Self::default()
        }
    }

    pub fn image_name<S: Into<String>>(mut self, name: S) -> Self {
        self.image_name = Some(name.into());
        self
    }

    /// Replace the target trails
    pub fn targets(mut self, targets: Vec<TargetSpec>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Append one target trail to the list being built
    pub fn target(mut self, spec: TargetSpec) -> Self {
        self.targets.get_or_insert_with(Vec::new).push(spec);
        self
    }

    pub fn combat(mut self, combat: CombatConfig) -> Self {
        self.combat = Some(combat);
        self
    }

    pub fn tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = Some(tick_ms);
        self
    }

    pub fn background(mut self, colour: Colour) -> Self {
        self.background = Some(colour);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<MeterConfig> {
        let mut config = self.base.unwrap_or_default();
        if let Some(image_name) = self.image_name {
            config.process.image_name = image_name;
        }
        if let Some(targets) = self.targets {
            config.targets = targets;
        }
        if let Some(combat) = self.combat {
            config.combat = combat;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.timing.tick_ms = tick_ms;
        }
        if let Some(background) = self.background {
            config.display.background = background;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = MeterConfig::default();
        assert_eq!(config.process.image_name, "Gw2.exe");
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].base, 0x13E_B0B4);
        assert_eq!(config.targets[0].offsets.to_string(), "0x34, 0x150, 0x8");
        assert_eq!(config.combat.flag_address, 0x0171_654C);
        assert_eq!(config.combat.sentinel_address, 0x0171_5970);
        assert_eq!(config.combat.sentinel_pattern, 1_065_353_216);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.display.background.to_string(), "#222222");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = MeterConfig::from_toml_str(
            r##"
            [timing]
            tick_ms = 500

            [display]
            background = "#000000"
            "##,
        )
        .unwrap();

        assert_eq!(config.timing.tick_ms, 500);
        assert_eq!(config.timing.sustained_window_secs, 5);
        assert_eq!(config.display.background, Colour::rgb(0, 0, 0));
        assert_eq!(config.targets, vec![TargetSpec::regular()]);
        assert_eq!(config.combat, CombatConfig::default());
    }

    #[test]
    fn test_target_list_replaces_defaults() {
        let config = MeterConfig::from_toml_str(
            r#"
            [[target]]
            kind = "world_boss"
            base = 0x1400000
            offsets = "0x10, 0x2C, 8"

            [[target]]
            base = 0x1500000
            offsets = "0x4"
            "#,
        )
        .unwrap();

        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].kind, TargetKind::WorldBoss);
        assert_eq!(config.targets[0].offsets.values(), vec![0x10, 0x2C, 8]);
        assert_eq!(config.targets[0].offsets.to_string(), "0x10, 0x2C, 8");
        assert_eq!(config.targets[1].kind, TargetKind::Regular);
    }

    #[test]
    fn test_invalid_files_are_rejected() {
        assert!(matches!(
            MeterConfig::from_toml_str("target = []"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            MeterConfig::from_toml_str("[timing]\ntick_ms = 0"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            MeterConfig::from_toml_str("[timing]\ninstant_window_secs = 0"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            MeterConfig::from_toml_str("[[target]]\nbase = 1\noffsets = \"zz\""),
            Err(Error::Toml(_))
        ));
        assert!(matches!(
            MeterConfig::from_toml_str("[display]\nbackground = \"blue\""),
            Err(Error::Toml(_))
        ));
        assert!(MeterConfig::from_toml_str("not toml at all [").is_err());
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = MeterConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[process]\nimage_name = \"Gw2-64.exe\"").unwrap();

        let config = MeterConfig::load(file.path()).unwrap();
        assert_eq!(config.process.image_name, "Gw2-64.exe");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let config = MeterConfig::builder()
            .target(TargetSpec::new(
                TargetKind::Structure,
                0x20,
                "0x8, -4".parse().unwrap(),
            ))
            .tick_ms(100)
            .build()
            .unwrap();
        config.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("offsets = \"0x8, -4\""));
        assert!(written.contains("kind = \"structure\""));

        assert_eq!(MeterConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_builder_overrides() {
        let config = MeterConfig::builder()
            .image_name("Test.exe")
            .background(Colour::RED)
            .combat(CombatConfig {
                flag_address: 0x10,
                ..CombatConfig::default()
            })
            .build()
            .unwrap();

        assert_eq!(config.process.image_name, "Test.exe");
        assert_eq!(config.display.background, Colour::RED);
        assert_eq!(config.combat.flag_address, 0x10);
        assert_eq!(config.targets, vec![TargetSpec::regular()]);

        assert!(MeterConfig::builder().targets(vec![]).build().is_err());
    }

    #[test]
    fn test_builder_from_config_keeps_file_values() {
        let file = MeterConfig::from_toml_str("[timing]\naverage_freeze_secs = 9").unwrap();
        let config = MeterConfigBuilder::from_config(file)
            .tick_ms(125)
            .build()
            .unwrap();
        assert_eq!(config.timing.average_freeze_secs, 9);
        assert_eq!(config.timing.tick_ms, 125);
    }

    #[test]
    fn test_candidates_are_rebased() {
        let config = MeterConfig::default();
        let candidates = config.candidates(0x40_0000);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].base, 0x40_0000 + 0x13E_B0B4);
        assert_eq!(candidates[0].kind, TargetKind::Regular);
    }
}
