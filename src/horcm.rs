//! HORCM configuration file generation.
//!
//! Renders the `horcm10.conf` / `horcm20.conf` pair for a two-site GAD
//! deployment: each file points its monitor at the local service port and
//! its instance section at the peer's port. Output is plain text; saving
//! is a separate step so previews never touch the filesystem.

use crate::config::HorcmSettings;
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const PRIMARY_FILE_NAME: &str = "horcm10.conf";
pub const SECONDARY_FILE_NAME: &str = "horcm20.conf";

/// One VSP storage system as entered in the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VspParams {
    pub serial: String,
    pub ip: String,
}

/// One configured LUN: device group, device name, LDEV number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LunEntry {
    pub group: String,
    pub name: String,
    pub ldev: String,
}

pub struct HorcmGenerator {
    settings: HorcmSettings,
    ip_pattern: Regex,
}

impl Default for HorcmGenerator {
    fn default() -> Self {
        Self::new(HorcmSettings::default())
    }
}

impl HorcmGenerator {
    pub fn new(settings: HorcmSettings) -> Self {
        Self {
            settings,
            ip_pattern: Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("valid regex"),
        }
    }

    /// Validate the full form input before any rendering.
    pub fn validate_inputs(
        &self,
        server_ip: &str,
        vsp1: &VspParams,
        vsp2: &VspParams,
        luns: &[LunEntry],
    ) -> Result<()> {
        for ip in [server_ip, &vsp1.ip, &vsp2.ip] {
            if !self.ip_pattern.is_match(ip) {
                bail!("Invalid IP address format: {ip}");
            }
        }

        for serial in [&vsp1.serial, &vsp2.serial] {
            if serial.len() != 6 || !serial.chars().all(|c| c.is_ascii_digit()) {
                bail!("Serial number must be 6 digits: {serial}");
            }
        }

        if luns.is_empty() {
            bail!("At least one LUN configuration is required");
        }

        for lun in luns {
            if lun.group.is_empty() {
                bail!("Group ID cannot be empty");
            }
            if lun.name.is_empty() {
                bail!("Device name cannot be empty");
            }
            if lun.ldev.is_empty() || !lun.ldev.chars().all(|c| c.is_ascii_digit()) {
                bail!("LDEV number must be numeric");
            }
        }

        Ok(())
    }

    /// Render `horcm10.conf` for the primary instance.
    ///
    /// Callers run [`Self::validate_inputs`] first; `luns` must be non-empty.
    pub fn generate_primary(&self, server_ip: &str, vsp1: &VspParams, luns: &[LunEntry]) -> String {
        self.render(
            "VSP1",
            self.settings.primary_service,
            self.settings.secondary_service,
            server_ip,
            vsp1,
            luns,
        )
    }

    /// Render `horcm20.conf` for the secondary instance.
    ///
    /// Callers run [`Self::validate_inputs`] first; `luns` must be non-empty.
    pub fn generate_secondary(
        &self,
        server_ip: &str,
        vsp2: &VspParams,
        luns: &[LunEntry],
    ) -> String {
        self.render(
            "VSP2",
            self.settings.secondary_service,
            self.settings.primary_service,
            server_ip,
            vsp2,
            luns,
        )
    }

    fn render(
        &self,
        label: &str,
        listen_service: u16,
        peer_service: u16,
        server_ip: &str,
        vsp: &VspParams,
        luns: &[LunEntry],
    ) -> String {
        let ldev_lines: Vec<String> = luns
            .iter()
            .map(|lun| {
                format!(
                    "{}    {}    {}    {}    0",
                    lun.group, lun.name, vsp.serial, lun.ldev
                )
            })
            .collect();

        let groups: BTreeSet<&str> = luns.iter().map(|lun| lun.group.as_str()).collect();
        let inst_lines: Vec<String> = groups
            .into_iter()
            .map(|group| format!("{group}    {server_ip}    {peer_service}"))
            .collect();

        format!(
            "HORCM_MON\n\
             # ip_address service poll(10ms) timeout(10ms)\n\
             {server_ip}    {listen_service}    {poll}       {timeout}\n\
             \n\
             HORCM_CMD\n\
             # {label} (Serial No.: {serial})\n\
             \\\\.\\CMD-{serial}-{first_ldev}\n\
             \n\
             HORCM_LDEV\n\
             # DeviceGroup, DeviceName, Serial#, CU:LDEV(LDEV#), MU#\n\
             {ldev_section}\n\
             \n\
             HORCM_INST\n\
             # DeviceGroup         ip_address      service\n\
             {inst_section}",
            poll = self.settings.poll_ms,
            timeout = self.settings.timeout_ms,
            serial = vsp.serial,
            first_ldev = luns[0].ldev,
            ldev_section = ldev_lines.join("\n"),
            inst_section = inst_lines.join("\n"),
        )
    }

    /// Validate, render and write both files into `dir`.
    pub fn save(
        &self,
        dir: &Path,
        server_ip: &str,
        vsp1: &VspParams,
        vsp2: &VspParams,
        luns: &[LunEntry],
    ) -> Result<(PathBuf, PathBuf)> {
        self.validate_inputs(server_ip, vsp1, vsp2, luns)?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let primary_path = dir.join(PRIMARY_FILE_NAME);
        let secondary_path = dir.join(SECONDARY_FILE_NAME);

        std::fs::write(&primary_path, self.generate_primary(server_ip, vsp1, luns))
            .with_context(|| format!("failed to write {}", primary_path.display()))?;
        std::fs::write(
            &secondary_path,
            self.generate_secondary(server_ip, vsp2, luns),
        )
        .with_context(|| format!("failed to write {}", secondary_path.display()))?;

        Ok((primary_path, secondary_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vsp1() -> VspParams {
        VspParams {
            serial: "811111".to_string(),
            ip: "1.1.1.1".to_string(),
        }
    }

    fn vsp2() -> VspParams {
        VspParams {
            serial: "822222".to_string(),
            ip: "2.2.2.2".to_string(),
        }
    }

    fn luns() -> Vec<LunEntry> {
        vec![
            LunEntry {
                group: "ORACLE".to_string(),
                name: "GAD_TEST_DB".to_string(),
                ldev: "52735".to_string(),
            },
            LunEntry {
                group: "HDID".to_string(),
                name: "GAD_TEST_HA".to_string(),
                ldev: "6001".to_string(),
            },
            LunEntry {
                group: "ORACLE".to_string(),
                name: "GAD_TEST_DB2".to_string(),
                ldev: "52736".to_string(),
            },
        ]
    }

    #[test]
    fn test_validate_accepts_well_formed_input() {
        let gen = HorcmGenerator::default();
        assert!(gen
            .validate_inputs("127.0.0.1", &vsp1(), &vsp2(), &luns())
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_ip() {
        let gen = HorcmGenerator::default();
        let err = gen
            .validate_inputs("127.0.0", &vsp1(), &vsp2(), &luns())
            .unwrap_err();
        assert!(err.to_string().contains("Invalid IP address"));

        let mut bad_vsp = vsp1();
        bad_vsp.ip = "one.two.three.four".to_string();
        assert!(gen
            .validate_inputs("127.0.0.1", &bad_vsp, &vsp2(), &luns())
            .is_err());
    }

    #[test]
    fn test_validate_rejects_bad_serial() {
        let gen = HorcmGenerator::default();
        for serial in ["81111", "8111111", "81111a", ""] {
            let mut vsp = vsp1();
            vsp.serial = serial.to_string();
            let err = gen
                .validate_inputs("127.0.0.1", &vsp, &vsp2(), &luns())
                .unwrap_err();
            assert!(err.to_string().contains("6 digits"), "serial {serial:?}");
        }
    }

    #[test]
    fn test_validate_rejects_bad_luns() {
        let gen = HorcmGenerator::default();
        assert!(gen
            .validate_inputs("127.0.0.1", &vsp1(), &vsp2(), &[])
            .is_err());

        let mut partial = luns();
        partial[0].ldev = "52x35".to_string();
        let err = gen
            .validate_inputs("127.0.0.1", &vsp1(), &vsp2(), &partial)
            .unwrap_err();
        assert!(err.to_string().contains("must be numeric"));

        let mut empty_group = luns();
        empty_group[1].group = String::new();
        assert!(gen
            .validate_inputs("127.0.0.1", &vsp1(), &vsp2(), &empty_group)
            .is_err());
    }

    #[test]
    fn test_primary_config_layout() {
        let gen = HorcmGenerator::default();
        let text = gen.generate_primary("127.0.0.1", &vsp1(), &luns());

        assert!(text.starts_with("HORCM_MON\n"));
        assert!(text.contains("127.0.0.1    5010    1000       3000"));
        assert!(text.contains("\\\\.\\CMD-811111-52735"));
        assert!(text.contains("ORACLE    GAD_TEST_DB    811111    52735    0"));
        assert!(text.contains("HDID    GAD_TEST_HA    811111    6001    0"));
        // One INST line per distinct group, sorted, pointing at the peer.
        assert!(text.contains("HDID    127.0.0.1    5020"));
        assert!(text.contains("ORACLE    127.0.0.1    5020"));
        assert_eq!(text.matches("ORACLE    127.0.0.1    5020").count(), 1);
    }

    #[test]
    fn test_secondary_config_swaps_services_and_serial() {
        let gen = HorcmGenerator::default();
        let text = gen.generate_secondary("127.0.0.1", &vsp2(), &luns());

        assert!(text.contains("127.0.0.1    5020    1000       3000"));
        assert!(text.contains("\\\\.\\CMD-822222-52735"));
        assert!(text.contains("ORACLE    127.0.0.1    5010"));
    }

    #[test]
    fn test_custom_services_flow_through() {
        let gen = HorcmGenerator::new(HorcmSettings {
            primary_service: 6010,
            secondary_service: 6020,
            poll_ms: 500,
            timeout_ms: 2000,
        });
        let text = gen.generate_primary("10.0.0.1", &vsp1(), &luns());
        assert!(text.contains("10.0.0.1    6010    500       2000"));
        assert!(text.contains("ORACLE    10.0.0.1    6020"));
    }

    #[test]
    fn test_save_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let gen = HorcmGenerator::default();
        let (primary, secondary) = gen
            .save(dir.path(), "127.0.0.1", &vsp1(), &vsp2(), &luns())
            .unwrap();

        assert_eq!(primary.file_name().unwrap(), PRIMARY_FILE_NAME);
        assert_eq!(secondary.file_name().unwrap(), SECONDARY_FILE_NAME);

        let primary_text = std::fs::read_to_string(&primary).unwrap();
        let secondary_text = std::fs::read_to_string(&secondary).unwrap();
        assert!(primary_text.contains("811111"));
        assert!(secondary_text.contains("822222"));
    }

    #[test]
    fn test_save_refuses_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let gen = HorcmGenerator::default();
        let result = gen.save(dir.path(), "not-an-ip", &vsp1(), &vsp2(), &luns());
        assert!(result.is_err());
        assert!(!dir.path().join(PRIMARY_FILE_NAME).exists());
    }
}
