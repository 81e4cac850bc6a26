//! Seams to the host process
//!
//! Two collaborators live outside this crate: the mechanism that patches the
//! process's import table so the profile API lands in the redirector, and the
//! real OS API used for native-write passthrough. Both are reached through
//! traits so everything above them is testable without a live process.

use std::fmt;

use crate::encoding::NativeStr;

/// A function of the private profile API that the redirector replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookTarget {
    /// `GetPrivateProfileStringA`
    GetStringA,
    /// `GetPrivateProfileStringW`
    GetStringW,
    /// `GetPrivateProfileIntA`
    GetIntA,
    /// `GetPrivateProfileIntW`
    GetIntW,
    /// `GetPrivateProfileSectionNamesA`
    GetSectionNamesA,
    /// `GetPrivateProfileSectionNamesW`
    GetSectionNamesW,
    /// `GetPrivateProfileSectionA`
    GetSectionA,
    /// `GetPrivateProfileSectionW`
    GetSectionW,
    /// `WritePrivateProfileStringA`
    WriteStringA,
    /// `WritePrivateProfileStringW`
    WriteStringW,
}

impl HookTarget {
    /// Every target, in installation order.
    pub const ALL: [Self; 10] = [
        Self::GetStringA,
        Self::GetStringW,
        Self::GetIntA,
        Self::GetIntW,
        Self::GetSectionNamesA,
        Self::GetSectionNamesW,
        Self::GetSectionA,
        Self::GetSectionW,
        Self::WriteStringA,
        Self::WriteStringW,
    ];

    /// Exported name of the replaced function.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetStringA => "GetPrivateProfileStringA",
            Self::GetStringW => "GetPrivateProfileStringW",
            Self::GetIntA => "GetPrivateProfileIntA",
            Self::GetIntW => "GetPrivateProfileIntW",
            Self::GetSectionNamesA => "GetPrivateProfileSectionNamesA",
            Self::GetSectionNamesW => "GetPrivateProfileSectionNamesW",
            Self::GetSectionA => "GetPrivateProfileSectionA",
            Self::GetSectionW => "GetPrivateProfileSectionW",
            Self::WriteStringA => "WritePrivateProfileStringA",
            Self::WriteStringW => "WritePrivateProfileStringW",
        }
    }
}

impl fmt::Display for HookTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Status code returned by the patching mechanism. Zero means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HookStatus(pub i32);

impl HookStatus {
    /// Successful attach or detach.
    pub const OK: Self = Self(0);

    /// Whether the operation succeeded.
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for HookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Installs and removes the redirector's replacements in the host process.
pub trait HookInstaller {
    /// Route calls to `target` into the redirector.
    fn attach(&mut self, target: HookTarget) -> HookStatus;

    /// Restore the system function behind `target`.
    fn detach(&mut self, target: HookTarget) -> HookStatus;
}

/// Arguments of a write forwarded to the real OS API, as the caller passed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWriteArgs<'a> {
    /// Section name
    pub section: Option<NativeStr<'a>>,
    /// Key name, `None` to delete the section
    pub key: Option<NativeStr<'a>>,
    /// Value, `None` to delete the key
    pub value: Option<NativeStr<'a>>,
    /// File path
    pub path: Option<NativeStr<'a>>,
}

/// The unhooked OS profile API.
pub trait NativeProfileApi: Send + Sync {
    /// Call the system `WritePrivateProfileString` and return its result.
    fn write_string(&self, args: NativeWriteArgs<'_>) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_targets_are_distinct() {
        let names: HashSet<_> = HookTarget::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), HookTarget::ALL.len());
        assert!(
            HookTarget::ALL
                .iter()
                .all(|t| t.name().ends_with('A') || t.name().ends_with('W'))
        );
    }

    #[test]
    fn test_hook_status() {
        assert!(HookStatus::OK.is_ok());
        assert!(!HookStatus(8).is_ok());
        assert_eq!(HookStatus(8).to_string(), "8");
        assert_eq!(HookTarget::GetIntW.to_string(), "GetPrivateProfileIntW");
    }
}
