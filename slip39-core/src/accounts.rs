// slip39-core/src/accounts.rs
//
// Multi-Chain Account Deriver
//
// Every request expands its path template into a lazy PathRange; row `i`
// pulls the i-th path of every range that is not yet exhausted. Bounded
// ranges drop out of later rows, unbounded ones keep going, and iteration
// ends once all ranges are exhausted.

use crate::chains::{AddressFormat, Chain};
use crate::config::DeriverConfig;
use crate::crypto::key_deriver::{KeyDeriver, KeySource};
use crate::crypto::path_range::{ConcretePath, PathRange, PathTemplate};
use crate::crypto::paths::DerivationPaths;
use crate::error::{CryptoError, WalletResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

// =============================================================================
// ACCOUNT
// =============================================================================

/// One derived account. Never mutated after creation.
pub struct Account {
    chain: Chain,
    path: ConcretePath,
    format: AddressFormat,
    address: String,
    private_key: Option<Zeroizing<[u8; 32]>>,
}

impl Account {
    #[inline]
    pub fn chain(&self) -> Chain {
        self.chain
    }

    #[inline]
    pub fn path(&self) -> &ConcretePath {
        &self.path
    }

    #[inline]
    pub fn format(&self) -> AddressFormat {
        self.format
    }

    /// Address, or the serialized extended public key for `Xpub`.
    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// # Warning
    /// Secret material, never log it.
    pub fn private_key(&self) -> Option<&[u8; 32]> {
        self.private_key.as_deref()
    }

    /// The public `[symbol, path, address]` triple; private keys never leave.
    pub fn to_wire(&self) -> WireAccount {
        WireAccount {
            chain: self.chain.symbol().to_string(),
            path: self.path.to_string(),
            address: self.address.clone(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("chain", &self.chain)
            .field("path", &self.path.to_string())
            .field("format", &self.format)
            .field("address", &self.address)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Wire form of an account, serialized as a JSON array `[chain, path, address]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String, String)", into = "(String, String, String)")]
pub struct WireAccount {
    pub chain: String,
    pub path: String,
    pub address: String,
}

impl From<(String, String, String)> for WireAccount {
    fn from((chain, path, address): (String, String, String)) -> Self {
        Self { chain, path, address }
    }
}

impl From<WireAccount> for (String, String, String) {
    fn from(account: WireAccount) -> Self {
        (account.chain, account.path, account.address)
    }
}

/// The accounts sharing one enumeration index: one row of the stream.
#[derive(Debug)]
pub struct AccountGroup {
    pub index: u64,
    pub accounts: Vec<Account>,
}

impl AccountGroup {
    pub fn to_wire(&self) -> Vec<WireAccount> {
        self.accounts.iter().map(Account::to_wire).collect()
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// One `(chain, path template, format)` derivation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRequest {
    chain: Chain,
    format: AddressFormat,
    path: Option<PathTemplate>,
}

impl AccountRequest {
    /// The chain's default path in `format`.
    pub fn new(chain: Chain, format: AddressFormat) -> WalletResult<Self> {
        chain.check_format(format)?;
        Ok(Self {
            chain,
            format,
            path: None,
        })
    }

    /// `m/...` replaces the default path; `../...` edits its final segments.
    pub fn with_path(mut self, path: &str) -> WalletResult<Self> {
        self.path = Some(PathTemplate::parse(path)?);
        self.template()?;
        Ok(self)
    }

    pub fn with_format(mut self, format: AddressFormat) -> WalletResult<Self> {
        self.chain.check_format(format)?;
        self.format = format;
        Ok(self)
    }

    #[inline]
    pub fn chain(&self) -> Chain {
        self.chain
    }

    #[inline]
    pub fn format(&self) -> AddressFormat {
        self.format
    }

    /// The effective template: the default path with any edit applied.
    pub fn template(&self) -> WalletResult<PathTemplate> {
        let default = DerivationPaths::default_template(self.chain, self.format)?;
        match &self.path {
            Some(edit) => default.edit(edit),
            None => Ok(default),
        }
    }
}

impl FromStr for AccountRequest {
    type Err = crate::error::WalletError;

    /// `SYM[:PATH]`, e.g. `ETH`, `BTC:../1/-3`, `DOGE:m/44'/3'/1'/0/-`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (symbol, path) = match s.split_once(':') {
            Some((symbol, path)) => (symbol, Some(path)),
            None => (s, None),
        };
        let chain: Chain = symbol.parse()?;
        let request = AccountRequest::new(chain, chain.default_format())?;
        match path {
            Some(path) => request.with_path(path),
            None => Ok(request),
        }
    }
}

// =============================================================================
// DERIVER
// =============================================================================

struct Lane {
    request: AccountRequest,
    range: PathRange,
    exhausted: bool,
}

/// Lazy iterator of [`AccountGroup`]s.
///
/// Yields at most one error, then stops.
pub struct AccountDeriver<'a> {
    source: KeySource<'a>,
    lanes: Vec<Lane>,
    config: DeriverConfig,
    next_index: u64,
    failed: bool,
}

impl<'a> AccountDeriver<'a> {
    pub fn new(
        source: KeySource<'a>,
        requests: &[AccountRequest],
        config: &DeriverConfig,
    ) -> WalletResult<Self> {
        let lanes = requests
            .iter()
            .map(|request| -> WalletResult<Lane> {
                let template = request.template()?;
                if source.is_public()
                    && request.format != AddressFormat::Xpub
                    && template.has_hardened()
                {
                    return Err(CryptoError::HardenedFromPublic(template.to_string()).into());
                }
                tracing::debug!(
                    chain = %request.chain,
                    format = %request.format,
                    path = %template,
                    "account request"
                );
                Ok(Lane {
                    request: request.clone(),
                    range: template.expand(),
                    exhausted: false,
                })
            })
            .collect::<WalletResult<Vec<_>>>()?;

        Ok(Self {
            source,
            lanes,
            config: config.clone(),
            next_index: 0,
            failed: false,
        })
    }

    /// Convenience for callers that want a bounded prefix.
    pub fn take_groups(self, n: usize) -> WalletResult<Vec<AccountGroup>> {
        self.take(n).collect()
    }

    fn derive_account(&self, request: &AccountRequest, path: ConcretePath) -> WalletResult<Account> {
        let include_private = self.config.include_private_keys;
        let max_depth = self.config.max_path_depth;

        if request.format == AddressFormat::Xpub {
            // Publish the last hardened level; the caller derives the rest.
            let path = match self.source {
                KeySource::Seed(_) => path.hardened_prefix(),
                KeySource::ExtendedPublic(_) => ConcretePath::new(path.root(), Vec::new()),
            };
            let key = KeyDeriver::derive(&self.source, &path, max_depth, false)?;
            return Ok(Account {
                chain: request.chain,
                address: key.xpub_string(),
                path,
                format: request.format,
                private_key: None,
            });
        }

        let key = KeyDeriver::derive(&self.source, &path, max_depth, include_private)?;
        Ok(Account {
            chain: request.chain,
            address: request.chain.address(key.public_key(), request.format)?,
            path,
            format: request.format,
            private_key: key.private_key,
        })
    }

    fn next_row(&mut self) -> WalletResult<Option<AccountGroup>> {
        let mut pending = Vec::with_capacity(self.lanes.len());
        for (i, lane) in self.lanes.iter_mut().enumerate() {
            if lane.exhausted {
                continue;
            }
            match lane.range.next() {
                Some(path) => pending.push((i, path)),
                None => lane.exhausted = true,
            }
        }
        if pending.is_empty() {
            return Ok(None);
        }

        let accounts = pending
            .into_iter()
            .map(|(i, path)| self.derive_account(&self.lanes[i].request, path))
            .collect::<WalletResult<Vec<_>>>()?;

        let group = AccountGroup {
            index: self.next_index,
            accounts,
        };
        self.next_index += 1;
        Ok(Some(group))
    }
}

impl Iterator for AccountDeriver<'_> {
    type Item = WalletResult<AccountGroup>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_row() {
            Ok(group) => group.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
