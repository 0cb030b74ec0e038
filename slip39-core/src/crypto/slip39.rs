// slip39-core/src/crypto/slip39.rs
//
// SLIP-39 Module - Shamir mnemonic shares
//
// Polynomial math, share checksums and the SLIP-39 wordlist live in `sssmc39`;
// this module plans groups, routes the passphrase and classifies failures.
//
// NOTE: recovery performs no passphrase check. A wrong passphrase decrypts to a
// different, equally valid entropy (plausible-deniability decoy wallets).

use crate::error::{MnemonicError, WalletError, WalletResult};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// One group of a SLIP-39 backup: `Name(threshold/count)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub member_threshold: u8,
    pub member_count: u8,
}

impl GroupSpec {
    pub fn new(name: &str, member_threshold: u8, member_count: u8) -> WalletResult<Self> {
        if member_threshold == 0 || member_threshold > member_count || member_count > 16 {
            return Err(MnemonicError::Slip39(format!(
                "invalid group {}({}/{})",
                name, member_threshold, member_count
            ))
            .into());
        }
        // SLIP-39 forbids 1-of-N groups with N > 1.
        if member_threshold == 1 && member_count > 1 {
            return Err(MnemonicError::Slip39(format!(
                "group {} must be 1/1 when its threshold is 1",
                name
            ))
            .into());
        }
        Ok(Self {
            name: name.to_string(),
            member_threshold,
            member_count,
        })
    }
}

impl FromStr for GroupSpec {
    type Err = WalletError;

    /// Parses `Fam(2/4)`; a bare `2/4` gets an empty name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WalletError::Mnemonic(MnemonicError::Slip39(format!("bad group '{}'", s)));
        let s = s.trim();
        let (name, ratio) = match s.split_once('(') {
            Some((name, rest)) => (name.trim(), rest.strip_suffix(')').ok_or_else(invalid)?),
            None => ("", s),
        };
        let (threshold, count) = ratio.split_once('/').ok_or_else(invalid)?;
        let threshold = threshold.trim().parse().map_err(|_| invalid())?;
        let count = count.trim().parse().map_err(|_| invalid())?;
        GroupSpec::new(name, threshold, count)
    }
}

impl fmt::Display for GroupSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}/{})", self.name, self.member_threshold, self.member_count)
    }
}

/// How entropy is split into groups of shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    pub group_threshold: u8,
    pub groups: Vec<GroupSpec>,
    pub iteration_exponent: u8,
}

impl GroupPlan {
    pub fn new(group_threshold: u8, groups: Vec<GroupSpec>) -> WalletResult<Self> {
        if groups.is_empty()
            || group_threshold == 0
            || group_threshold as usize > groups.len()
            || groups.len() > 16
        {
            return Err(MnemonicError::Slip39(format!(
                "group threshold {} of {} groups",
                group_threshold,
                groups.len()
            ))
            .into());
        }
        Ok(Self {
            group_threshold,
            groups,
            iteration_exponent: 0,
        })
    }

    /// A single 1-of-1 group.
    pub fn single() -> Self {
        Self {
            group_threshold: 1,
            groups: vec![GroupSpec {
                name: "Single".to_string(),
                member_threshold: 1,
                member_count: 1,
            }],
            iteration_exponent: 0,
        }
    }
}

impl Default for GroupPlan {
    /// First(1/1), Second(1/1), Fam(2/4), Frens(3/6); any 2 groups recover.
    fn default() -> Self {
        let group = |name: &str, member_threshold, member_count| GroupSpec {
            name: name.to_string(),
            member_threshold,
            member_count,
        };
        Self {
            group_threshold: 2,
            groups: vec![
                group("First", 1, 1),
                group("Second", 1, 1),
                group("Fam", 2, 4),
                group("Frens", 3, 6),
            ],
            iteration_exponent: 0,
        }
    }
}

/// The mnemonics of one group, in share order.
#[derive(Clone)]
pub struct ShareGroup {
    pub spec: GroupSpec,
    pub mnemonics: Vec<Zeroizing<String>>,
}

impl ShareGroup {
    /// The mnemonics as borrowed phrases, ready for [`combine`].
    pub fn phrases(&self) -> Vec<&str> {
        self.mnemonics.iter().map(|m| m.as_str()).collect()
    }
}

impl fmt::Debug for ShareGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareGroup")
            .field("spec", &self.spec)
            .field("mnemonics", &format_args!("[REDACTED; {}]", self.mnemonics.len()))
            .finish()
    }
}

/// Splits `secret` into SLIP-39 share groups encrypted under `passphrase`.
///
/// # Errors
/// `Slip39` for a nonzero iteration exponent: `sssmc39` does not recover
/// shares written with one.
pub fn split(secret: &[u8], plan: &GroupPlan, passphrase: &str) -> WalletResult<Vec<ShareGroup>> {
    if plan.iteration_exponent != 0 {
        return Err(MnemonicError::Slip39(format!(
            "unsupported iteration exponent {}",
            plan.iteration_exponent
        ))
        .into());
    }
    let groups: Vec<(u8, u8)> = plan
        .groups
        .iter()
        .map(|g| (g.member_threshold, g.member_count))
        .collect();

    let shares = sssmc39::generate_mnemonics(
        plan.group_threshold,
        &groups,
        secret,
        passphrase,
        plan.iteration_exponent,
    )
    .map_err(|e| classify(e.to_string()))?;

    plan.groups
        .iter()
        .zip(shares)
        .map(|(spec, share)| {
            let mnemonics = share
                .mnemonic_list()
                .map_err(|e| classify(e.to_string()))?
                .into_iter()
                .map(|words| Zeroizing::new(words.join(" ")))
                .collect();
            Ok(ShareGroup {
                spec: spec.clone(),
                mnemonics,
            })
        })
        .collect()
}

/// Recovers the secret from a threshold-satisfying set of mnemonics.
///
/// # Errors
/// `InsufficientShares` when the group or member thresholds are not met.
pub fn combine<S: AsRef<str>>(mnemonics: &[S], passphrase: &str) -> WalletResult<Zeroizing<Vec<u8>>> {
    if mnemonics.is_empty() {
        return Err(MnemonicError::InsufficientShares("no mnemonics supplied".to_string()).into());
    }
    let words: Vec<Vec<String>> = mnemonics
        .iter()
        .map(|m| {
            m.as_ref()
                .split_whitespace()
                .map(str::to_lowercase)
                .collect()
        })
        .collect();

    sssmc39::combine_mnemonics(&words, passphrase)
        .map(Zeroizing::new)
        .map_err(|e| classify(e.to_string()))
}

fn classify(message: String) -> WalletError {
    let lower = message.to_lowercase();
    if lower.contains("insufficient") || lower.contains("wrong number of mnemonics") {
        MnemonicError::InsufficientShares(message).into()
    } else {
        MnemonicError::Slip39(message).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_spec_parse() {
        let spec: GroupSpec = "Fam(2/4)".parse().unwrap();
        assert_eq!(spec, GroupSpec::new("Fam", 2, 4).unwrap());
        assert_eq!(spec.to_string(), "Fam(2/4)");

        let bare: GroupSpec = "3/5".parse().unwrap();
        assert_eq!(bare.name, "");
        assert_eq!(bare.member_count, 5);

        assert!("Fam(5/4)".parse::<GroupSpec>().is_err());
        assert!("Fam(1/3)".parse::<GroupSpec>().is_err());
        assert!("Fam(2-4)".parse::<GroupSpec>().is_err());
    }

    #[test]
    fn test_group_plan_validation() {
        assert!(GroupPlan::new(2, vec![GroupSpec::new("A", 1, 1).unwrap()]).is_err());
        assert!(GroupPlan::new(0, vec![GroupSpec::new("A", 1, 1).unwrap()]).is_err());
        assert!(GroupPlan::new(1, vec![]).is_err());
    }

    #[test]
    fn test_split_shape_follows_plan() {
        let plan = GroupPlan::default();
        let groups = split(&[0x11; 16], &plan, "").unwrap();
        let counts: Vec<usize> = groups.iter().map(|g| g.mnemonics.len()).collect();
        assert_eq!(counts, vec![1, 1, 4, 6]);
        assert_eq!(groups[2].spec.name, "Fam");
        // 128-bit secrets encode as 20-word shares
        assert_eq!(groups[0].mnemonics[0].split(' ').count(), 20);
    }

    #[test]
    fn test_combine_threshold_met() {
        let secret = [0x42u8; 32];
        let groups = split(&secret, &GroupPlan::default(), "").unwrap();
        let shares = [
            groups[0].mnemonics[0].as_str(),
            groups[2].mnemonics[1].as_str(),
            groups[2].mnemonics[3].as_str(),
        ];
        assert_eq!(combine(&shares, "").unwrap().as_slice(), &secret);
    }

    #[test]
    fn test_default_plan_roundtrip() {
        let secret = [0x07u8; 16];
        let plan = GroupPlan::default();
        assert_eq!(plan.iteration_exponent, 0);
        let groups = split(&secret, &plan, "correct").unwrap();
        let shares = [
            groups[1].mnemonics[0].as_str(),
            groups[3].mnemonics[0].as_str(),
            groups[3].mnemonics[4].as_str(),
            groups[3].mnemonics[5].as_str(),
        ];
        assert_eq!(combine(&shares, "correct").unwrap().as_slice(), &secret);
    }

    #[test]
    fn test_nonzero_iteration_exponent_rejected() {
        let plan = GroupPlan {
            iteration_exponent: 1,
            ..GroupPlan::single()
        };
        assert!(matches!(
            split(&[0x07u8; 16], &plan, ""),
            Err(WalletError::Mnemonic(MnemonicError::Slip39(_)))
        ));
    }

    #[test]
    fn test_combine_insufficient() {
        let groups = split(&[0x42u8; 16], &GroupPlan::default(), "").unwrap();
        let shares = [groups[0].mnemonics[0].as_str()];
        assert!(matches!(
            combine(&shares, ""),
            Err(WalletError::Mnemonic(MnemonicError::InsufficientShares(_)))
        ));
        assert!(matches!(
            combine::<&str>(&[], ""),
            Err(WalletError::Mnemonic(MnemonicError::InsufficientShares(_)))
        ));
    }

    #[test]
    fn test_wrong_passphrase_is_a_decoy() {
        let secret = [0x07u8; 16];
        let groups = split(&secret, &GroupPlan::single(), "correct").unwrap();
        let shares = [groups[0].mnemonics[0].as_str()];

        let right = combine(&shares, "correct").unwrap();
        let decoy = combine(&shares, "wrong").unwrap();
        assert_eq!(right.as_slice(), &secret);
        assert_eq!(decoy.len(), secret.len());
        assert_ne!(decoy.as_slice(), &secret);
    }

    #[test]
    fn test_debug_redacts_mnemonics() {
        let groups = split(&[0x01; 16], &GroupPlan::single(), "").unwrap();
        let debug = format!("{:?}", groups[0]);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(groups[0].mnemonics[0].as_str()));
    }
}
