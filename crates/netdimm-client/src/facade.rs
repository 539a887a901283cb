// facade.rs — the three public operations: info, send, reboot.
//
// Each opens a fresh session — one connection per operation — composes the
// command layer (and, for `send`, the upload pipeline and target policy),
// and relies on `Session` going out of scope to release the socket on every
// exit path, success or error.

use std::net::{IpAddr, SocketAddr};

use netdimm_proto::{Cipher, DeviceInfo, FirmwareVersion, NetDimmError, Result, TargetFamily, NETDIMM_PORT};
use tracing::info as log_info;

use crate::session::Session;
use crate::upload;

/// Time limit sent to the device before a reboot.
const REBOOT_TIME_LIMIT_MINUTES: u32 = 10;

/// Host mode requested at the start of `send` to display "NOW LOADING...".
const HOST_MODE_LOADING: u8 = 1;

/// Driver for one NetDIMM device. Cheap to construct; each public operation
/// opens and closes its own TCP session.
#[derive(Debug, Clone)]
pub struct NetDimm {
    ip: IpAddr,
    port: u16,
    target: TargetFamily,
    version: FirmwareVersion,
    quiet: bool,
}

impl NetDimm {
    /// Start building a driver for the device at `ip`, with the usual
    /// defaults: target family Naomi, firmware version Unknown.
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            port: NETDIMM_PORT,
            target: TargetFamily::default(),
            version: FirmwareVersion::default(),
            quiet: false,
        }
    }

    pub fn with_target(mut self, target: TargetFamily) -> Self {
        self.target = target;
        self
    }

    pub fn with_version(mut self, version: FirmwareVersion) -> Self {
        self.version = version;
        self
    }

    /// Overrides the fixed wire port (10703) the device normally listens on.
    /// Exists for integration tests driving a scripted loopback server; real
    /// hardware always uses the default.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Suppresses internal diagnostic logging when `true`; callers who want
    /// traces install a `tracing` subscriber instead.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    fn log(&self, message: &str) {
        if !self.quiet {
            log_info!(target: "netdimm_client::facade", "{message}");
        }
    }

    /// Open a session, query device info, close.
    pub fn info(&self) -> Result<DeviceInfo> {
        let mut session = Session::open(self.addr())?;
        session.get_info()
    }

    /// Open a session, set host mode to "loading", send the key code (or the
    /// magic zero-key to disable encryption), run the upload pipeline, close.
    ///
    /// Preconditions: `data` is non-empty; if `key` is set, `data.len()` is a
    /// multiple of 8.
    pub fn send(
        &self,
        data: &[u8],
        key: Option<[u8; 8]>,
        mut progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> Result<()> {
        if data.is_empty() {
            return Err(NetDimmError::InvalidArgument(
                "upload payload must not be empty".to_string(),
            ));
        }
        if key.is_some() && data.len() % 8 != 0 {
            return Err(NetDimmError::InvalidArgument(
                "upload payload length must be a multiple of 8 bytes when a key is set".to_string(),
            ));
        }

        let mut session = Session::open(self.addr())?;
        self.log("sending upload payload");

        if let Some(cb) = progress.as_deref_mut() {
            cb(0, data.len());
        }

        session.set_host_mode(HOST_MODE_LOADING)?;
        session.set_key_code(key.unwrap_or([0u8; 8]))?;

        let cipher = Cipher::new(key);
        upload::upload(&mut session, data, &cipher, |done, total| {
            if let Some(cb) = progress.as_deref_mut() {
                cb(done, total);
            }
        })
    }

    /// Open a session, restart, set the post-boot time limit, and — on
    /// Triforce — apply the boot-ID patch. Close.
    pub fn reboot(&self) -> Result<()> {
        let mut session = Session::open(self.addr())?;
        self.log("rebooting");

        session.restart()?;
        session.set_time_limit(REBOOT_TIME_LIMIT_MINUTES)?;

        if self.target == TargetFamily::Triforce {
            if let Some(pokes) = netdimm_proto::policy::boot_id_patch(self.version) {
                for (addr, value) in pokes {
                    session.host_poke32(addr, value)?;
                }
            }
        }

        Ok(())
    }
}
