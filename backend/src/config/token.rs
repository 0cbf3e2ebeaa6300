//! Loading the bearer token signing secret.
//!
//! The secret comes from the file named by `JWT_SECRET_FILE`, or failing
//! that from `JWT_SECRET`. Release builds refuse to start without a secret
//! of at least [`TOKEN_SECRET_MIN_LEN`] bytes. Debug builds warn and fall
//! back to a random per-process secret, so tokens do not survive restarts.

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

/// Variable holding the secret inline.
pub const TOKEN_SECRET_ENV: &str = "JWT_SECRET";
/// Variable naming a file that holds the secret. Takes precedence.
pub const TOKEN_SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
/// Shortest secret accepted in release builds, in bytes.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode controlling how strictly configuration is validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerate missing secrets with warnings.
    Debug,
    /// Require a configured secret.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Signing secret, wiped from memory on drop.
pub struct TokenSecret {
    bytes: Zeroizing<Vec<u8>>,
    ephemeral: bool,
}

impl TokenSecret {
    /// Raw secret bytes for key construction.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Whether the secret was generated for this process only.
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    fn generate() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
        rand::thread_rng().fill_bytes(bytes.as_mut_slice());
        Self {
            bytes,
            ephemeral: true,
        }
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSecret")
            .field("len", &self.bytes.len())
            .field("ephemeral", &self.ephemeral)
            .finish_non_exhaustive()
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// Neither variable is set.
    #[error("no token secret configured; set {TOKEN_SECRET_FILE_ENV} or {TOKEN_SECRET_ENV}")]
    MissingSecret,
    /// The secret file could not be read.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configured secret is shorter than [`TOKEN_SECRET_MIN_LEN`].
    #[error("token secret from {origin} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        origin: &'static str,
        length: usize,
        min_len: usize,
    },
}

/// Load the signing secret from the environment.
///
/// ```
/// use flowboard::config::{BuildMode, token_secret_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("s".repeat(32)),
///     _ => None,
/// });
///
/// let secret = token_secret_from_env(&env, BuildMode::Release).expect("secret");
/// assert_eq!(secret.expose().len(), 32);
/// ```
///
/// # Errors
///
/// In release builds, returns [`TokenConfigError`] when the secret is
/// missing, unreadable or too short.
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSecret, TokenConfigError> {
    let configured = match non_empty(env.string(TOKEN_SECRET_FILE_ENV)) {
        Some(path) => read_secret_file(PathBuf::from(path), mode)?,
        None => non_empty(env.string(TOKEN_SECRET_ENV))
            .map(|value| (Zeroizing::new(value.into_bytes()), TOKEN_SECRET_ENV)),
    };

    let Some((bytes, origin)) = configured else {
        if mode.is_debug() {
            warn!("no token secret configured; using an ephemeral secret (dev only)");
            return Ok(TokenSecret::generate());
        }
        return Err(TokenConfigError::MissingSecret);
    };

    let length = bytes.len();
    if length < TOKEN_SECRET_MIN_LEN {
        if !mode.is_debug() {
            return Err(TokenConfigError::SecretTooShort {
                origin,
                length,
                min_len: TOKEN_SECRET_MIN_LEN,
            });
        }
        warn!(
            origin,
            length,
            min_len = TOKEN_SECRET_MIN_LEN,
            "token secret shorter than recommended"
        );
    }

    Ok(TokenSecret {
        bytes,
        ephemeral: false,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

type LoadedSecret = Option<(Zeroizing<Vec<u8>>, &'static str)>;

fn read_secret_file(path: PathBuf, mode: BuildMode) -> Result<LoadedSecret, TokenConfigError> {
    match std::fs::read(&path) {
        Ok(raw) => {
            let mut bytes = Zeroizing::new(raw);
            while bytes.last().is_some_and(|byte| matches!(byte, b'\n' | b'\r')) {
                bytes.pop();
            }
            Ok(Some((bytes, TOKEN_SECRET_FILE_ENV)))
        }
        Err(source) if mode.is_debug() => {
            warn!(
                path = %path.display(),
                error = %source,
                "token secret file unreadable; using an ephemeral secret (dev only)"
            );
            Ok(None)
        }
        Err(source) => Err(TokenConfigError::SecretRead { path, source }),
    }
}
