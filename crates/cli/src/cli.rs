//! The `mailbox-backup` command line surface.

use anyhow::{Context, Result};
use mailbox_argparse::{Arg, DescribeError, Registry, Shape, Values};
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::folders::FolderFilter;
use crate::organise::{LocalOrganisation, RemoteOrganisation};
use crate::tls::TlsMode;

pub const HELP: &str = "HELP";
pub const CONFIG: &str = "CONFIG";
pub const USER: &str = "USER";
pub const PASS: &str = "PASS";
pub const SERVER: &str = "SERVER";
pub const SERVER_PORT: &str = "SERVER_PORT";
pub const OUTPUTDIR: &str = "OUTPUTDIR";
pub const FOLDER_INC: &str = "FOLDER_INC";
pub const FOLDER_EXC: &str = "FOLDER_EXC";
pub const DOWNLOAD_NO: &str = "DOWNLOAD_NO";
pub const TLSMODE: &str = "TLSMODE";
pub const REMOTE_MOVE: &str = "REMOTE_MOVE";
pub const IMAP_LOG: &str = "IMAP_LOG";
pub const REMOTE_HOME: &str = "REMOTE_HOME";
pub const LOCAL_ORG: &str = "LOCAL_ORG";
pub const AGE: &str = "AGE";

const DEFAULT_PORT: u16 = 993;
const DEFAULT_WIDTH: usize = 80;

pub const BANNER: &str = "Mailbox Backup\n  Download remote mail items to local filesystem\n";

/// Describe every argument the binary accepts.
pub fn registry() -> Result<Registry, DescribeError> {
    let mut registry = Registry::new();

    registry.describe(
        Arg::new(HELP, Shape::Help)
            .switches(["-h", "-?", "--help"])
            .label("Help")
            .help("Display this help"),
    )?;
    registry.describe(
        Arg::new(CONFIG, Shape::ArgsFile)
            .switches(["-c", "--config"])
            .label("Config file")
            .help(
                "Configuration file\nLoads configuration file when encountered and inserts \
                 arguments into the queue. Subsequent arguments will override previous values.",
            ),
    )?;
    registry.describe(
        Arg::new(USER, Shape::Text)
            .switches(["-u", "--username"])
            .label("Username")
            .help("Account username")
            .required(),
    )?;
    registry.describe(
        Arg::new(PASS, Shape::Text)
            .switches(["-p", "--password"])
            .label("Password")
            .help("Account password")
            .required()
            .depends_on(USER),
    )?;
    registry.describe(
        Arg::new(SERVER, Shape::Text)
            .switches(["-s", "--server"])
            .label("Server")
            .help("Server address")
            .required(),
    )?;
    registry.describe(
        Arg::new(SERVER_PORT, Shape::Integer)
            .switch("--port")
            .label("Server port")
            .help("Server port")
            .default_value(DEFAULT_PORT.to_string()),
    )?;
    registry.describe(
        Arg::new(OUTPUTDIR, Shape::Text)
            .switches(["-o", "--outdir"])
            .label("Output")
            .help("Output directory")
            .required(),
    )?;
    registry.describe(
        Arg::new(FOLDER_INC, Shape::Text)
            .switch("-if")
            .label("Include pattern")
            .help(
                "Include folder regex\nWhen supplied, only remote folder names matching the \
                 pattern will be downloaded. (Otherwise all folders will be downloaded)",
            ),
    )?;
    registry.describe(
        Arg::new(FOLDER_EXC, Shape::Text)
            .switch("-xf")
            .label("Exclude pattern")
            .help(
                "Exclude folder regex\nWhen supplied, remote folders matching the pattern \
                 will not be downloaded",
            ),
    )?;
    registry.describe(
        Arg::new(DOWNLOAD_NO, Shape::Flag)
            .switch("--nodl")
            .label("No download")
            .help("Do not download"),
    )?;
    registry.describe(
        Arg::new(TLSMODE, Shape::options(TlsMode::names()))
            .switch("--tlsmode")
            .label("TLS Options")
            .help("TLS Options")
            .default_value(TlsMode::default().as_str()),
    )?;
    registry.describe(
        Arg::new(REMOTE_MOVE, Shape::Flag)
            .switch("--remotemove")
            .label("Organise remote mail")
            .help("Move and organise messages remotely on the server"),
    )?;
    registry.describe(
        Arg::new(IMAP_LOG, Shape::Text)
            .switches(["-il", "--imaplog"])
            .label("IMAP log")
            .help("IMAP log"),
    )?;
    registry.describe(
        Arg::new(REMOTE_HOME, Shape::Text)
            .switches(["-rh", "--remotehome"])
            .label("Remote home")
            .help("Remote folder that dated folders are created under when organising remote mail"),
    )?;
    registry.describe(
        Arg::new(LOCAL_ORG, Shape::options(LocalOrganisation::names()))
            .switch("--localorg")
            .label("Local organisation")
            .help("How downloaded messages are laid out in the output directory")
            .default_value(LocalOrganisation::default().as_str()),
    )?;
    registry.describe(
        Arg::new(AGE, Shape::Integer)
            .switch("--age")
            .label("Minimum age")
            .help("Only process messages at least this many days old"),
    )?;

    Ok(registry)
}

/// Resolved run settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub server: String,
    pub port: u16,
    pub output_dir: PathBuf,
    pub include_folders: Option<String>,
    pub exclude_folders: Option<String>,
    #[serde(skip)]
    pub folder_filter: FolderFilter,
    pub download: bool,
    pub tls_mode: TlsMode,
    pub remote_move: bool,
    pub remote_home: Option<String>,
    pub imap_log: Option<PathBuf>,
    pub local_organisation: LocalOrganisation,
    pub min_age_days: Option<u32>,
}

impl Settings {
    /// Convert a successfully parsed value store.
    pub fn from_values(values: &Values) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            values
                .text(key)
                .map(str::to_string)
                .with_context(|| format!("missing value for {key}"))
        };
        let optional = |key: &str| values.text(key).map(str::to_string);

        let port = values.integer_or(SERVER_PORT, i32::from(DEFAULT_PORT));
        let port = u16::try_from(port).with_context(|| format!("server port out of range: {port}"))?;

        let min_age_days = values
            .integer(AGE)
            .map(|days| u32::try_from(days).with_context(|| format!("age out of range: {days}")))
            .transpose()?;

        let include_folders = optional(FOLDER_INC);
        let exclude_folders = optional(FOLDER_EXC);
        let folder_filter =
            FolderFilter::new(include_folders.as_deref(), exclude_folders.as_deref())?;

        let tls_mode = match values.text(TLSMODE) {
            Some(mode) => mode.parse()?,
            None => TlsMode::default(),
        };
        let local_organisation = match values.text(LOCAL_ORG) {
            Some(org) => org.parse()?,
            None => LocalOrganisation::default(),
        };

        Ok(Self {
            username: required(USER)?,
            password: required(PASS)?,
            server: required(SERVER)?,
            port,
            output_dir: PathBuf::from(required(OUTPUTDIR)?),
            include_folders,
            exclude_folders,
            folder_filter,
            download: !values.bool_or(DOWNLOAD_NO, false),
            tls_mode,
            remote_move: values.bool_or(REMOTE_MOVE, false),
            remote_home: optional(REMOTE_HOME),
            imap_log: optional(IMAP_LOG).map(PathBuf::from),
            local_organisation,
            min_age_days,
        })
    }

    pub fn remote_organisation(&self) -> RemoteOrganisation {
        if self.remote_move {
            RemoteOrganisation::Dated {
                home: self.remote_home.clone().unwrap_or_default(),
            }
        } else {
            RemoteOrganisation::Preserve
        }
    }
}

/// Turn raw process arguments into parser tokens. Arguments that are not valid
/// UTF-8 are converted lossily and left for the parser to report.
pub fn tokens<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().unwrap_or_else(|raw| {
                let lossy = raw.to_string_lossy().into_owned();
                tracing::warn!("argument '{lossy}' is not valid UTF-8");
                lossy
            })
        })
        .collect()
}

/// Width to wrap help text to: `COLUMNS` when it holds a number, else 80.
pub fn terminal_width() -> usize {
    width_from(std::env::var("COLUMNS").ok().as_deref())
}

fn width_from(columns: Option<&str>) -> usize {
    columns
        .and_then(|c| c.trim().parse().ok())
        .filter(|&w: &usize| w > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 8] = ["-u", "me", "-p", "secret", "-s", "imap.example.com", "-o", "out"];

    #[test]
    fn registry_describes_every_argument_in_order() {
        let registry = registry().unwrap();
        let keys: Vec<&str> = registry.iter().map(|d| d.key()).collect();
        assert_eq!(
            keys,
            [
                HELP, CONFIG, USER, PASS, SERVER, SERVER_PORT, OUTPUTDIR, FOLDER_INC, FOLDER_EXC,
                DOWNLOAD_NO, TLSMODE, REMOTE_MOVE, IMAP_LOG, REMOTE_HOME, LOCAL_ORG, AGE
            ]
        );
        assert_eq!(registry.help_descriptor().unwrap().primary_switch(), "-h");
    }

    #[test]
    fn defaults_fill_in_settings() {
        let parsed = registry().unwrap().parse(REQUIRED).unwrap();
        assert!(parsed.is_valid(), "{:?}", parsed.errors);

        let settings = Settings::from_values(&parsed.values).unwrap();
        assert_eq!(settings.username, "me");
        assert_eq!(settings.password, "secret");
        assert_eq!(settings.server, "imap.example.com");
        assert_eq!(settings.port, 993);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert!(settings.download);
        assert!(!settings.remote_move);
        assert_eq!(settings.tls_mode, TlsMode::SslOnConnect);
        assert_eq!(
            settings.local_organisation,
            LocalOrganisation::DatedFolderStructure
        );
        assert_eq!(settings.min_age_days, None);
        assert_eq!(settings.remote_organisation(), RemoteOrganisation::Preserve);
    }

    #[test]
    fn switches_map_onto_settings() {
        let mut args: Vec<&str> = REQUIRED.to_vec();
        args.extend([
            "--port", "143", "--nodl", "--tlsmode", "StartTls", "--remotemove", "-rh", "Archive",
            "--localorg", "FollowFolderStructure", "--age", "30", "-if", "^INBOX", "-il",
            "imap.log",
        ]);
        let parsed = registry().unwrap().parse(args).unwrap();
        assert!(parsed.is_valid(), "{:?}", parsed.errors);

        let settings = Settings::from_values(&parsed.values).unwrap();
        assert_eq!(settings.port, 143);
        assert!(!settings.download);
        assert_eq!(settings.tls_mode, TlsMode::StartTls);
        assert_eq!(
            settings.local_organisation,
            LocalOrganisation::FollowFolderStructure
        );
        assert_eq!(settings.min_age_days, Some(30));
        assert_eq!(settings.include_folders.as_deref(), Some("^INBOX"));
        assert_eq!(settings.imap_log, Some(PathBuf::from("imap.log")));
        assert!(!settings.folder_filter.accepts("Sent"));
        assert_eq!(
            settings.remote_organisation(),
            RemoteOrganisation::Dated {
                home: "Archive".to_string()
            }
        );
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let mut args: Vec<&str> = REQUIRED.to_vec();
        args.extend(["--port", "70000"]);
        let parsed = registry().unwrap().parse(args).unwrap();
        assert!(parsed.is_valid());

        let err = Settings::from_values(&parsed.values).unwrap_err();
        assert!(err.to_string().contains("server port out of range"));
    }

    #[test]
    fn bad_folder_pattern_is_rejected() {
        let mut args: Vec<&str> = REQUIRED.to_vec();
        args.extend(["-xf", "[unclosed"]);
        let parsed = registry().unwrap().parse(args).unwrap();

        let err = Settings::from_values(&parsed.values).unwrap_err();
        assert!(err.to_string().contains("invalid exclude folder pattern"));
    }

    #[test]
    fn password_is_not_serialised() {
        let parsed = registry().unwrap().parse(REQUIRED).unwrap();
        let settings = Settings::from_values(&parsed.values).unwrap();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"username\":\"me\""));
    }

    #[test]
    fn missing_password_reports_required_argument() {
        let registry = registry().unwrap();
        let parsed = registry.parse(["-u", "me", "-s", "host", "-o", "out"]).unwrap();
        let text = registry.render_errors(&parsed.errors);
        assert_eq!(
            text,
            "Required argument 'Password' (-p) missing\n\nUse '-h' to display more help.\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_arguments_are_reported_as_switches() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![OsString::from("-s"), OsString::from_vec(vec![0xff, b'm', b'e'])];
        assert_eq!(tokens(args), ["-s", "\u{FFFD}me"]);

        let registry = registry().unwrap();
        let parsed = registry
            .parse(tokens(vec![OsString::from_vec(vec![0xff])]))
            .unwrap();
        let text = registry.render_errors(&parsed.errors);
        assert!(text.starts_with("Unrecognised switch '\u{FFFD}'\n"), "{text}");
    }

    #[test]
    fn width_falls_back_to_eighty() {
        assert_eq!(width_from(None), 80);
        assert_eq!(width_from(Some("wide")), 80);
        assert_eq!(width_from(Some("0")), 80);
        assert_eq!(width_from(Some("120")), 120);
    }
}
