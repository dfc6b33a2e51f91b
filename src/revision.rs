//! Detection of the board revision from the host's system identifier.
use std::cell::OnceCell;
use std::fs;
use std::io;
use std::sync::OnceLock;

use log::debug;

use crate::device::error::DeviceError;
use crate::pin_map::HardwareRevision;
use crate::GpioResult;

/// Source of the one-line hardware revision identifier.
pub trait SystemIdentifier {
    fn read_system_identifier(&self) -> GpioResult<String>;
}

/// Reads the `Revision` line of `/proc/cpuinfo`.
///
/// A missing file or a file without a `Revision` line yields an empty identifier, which classifies as unknown.
/// Any other read failure is returned as `DeviceError::IdentifierUnreadable`.
#[derive(Copy, Clone, Debug, Default)]
pub struct CpuInfo;

impl CpuInfo {
    const PATH: &'static str = "/proc/cpuinfo";
}

impl SystemIdentifier for CpuInfo {
    fn read_system_identifier(&self) -> GpioResult<String> {
        let contents = match fs::read_to_string(Self::PATH) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist", Self::PATH);
                return Ok(String::new());
            }
            Err(source) => {
                return Err(DeviceError::IdentifierUnreadable {
                    path: Self::PATH.to_owned(),
                    source,
                }
                .into())
            }
        };

        Ok(contents
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim() == "Revision")
            .map(|(_, value)| value.trim().to_owned())
            .unwrap_or_default())
    }
}

/// Fixed identifier, for hosts where the revision is known up front.
#[derive(Clone, Debug)]
pub struct StaticIdentifier(pub String);

impl SystemIdentifier for StaticIdentifier {
    fn read_system_identifier(&self) -> GpioResult<String> {
        Ok(self.0.clone())
    }
}

/// Classifies a revision identifier such as `000e` or `1000002`.
///
/// The identifier must consist of hex digits only. Of those, only the last four are significant; the leading digits carry
/// the over-voltage warranty bit. Codes 2 and 3 are the revision A boards, everything from 4 up shares the revision B layout.
pub fn classify(identifier: &str) -> HardwareRevision {
    let identifier = identifier.trim();
    if identifier.is_empty() || !identifier.chars().all(|c| c.is_ascii_hexdigit()) {
        return HardwareRevision::Unknown;
    }

    // All ASCII at this point, so slicing by byte offset is safe.
    let significant = &identifier[identifier.len().saturating_sub(4)..];
    match u32::from_str_radix(significant, 16) {
        Ok(2) | Ok(3) => HardwareRevision::RevisionA,
        Ok(code) if code >= 4 => HardwareRevision::RevisionB,
        _ => HardwareRevision::Unknown,
    }
}

/// Reads the hardware revision once and remembers the answer.
///
/// A failed read is not remembered; the next `resolve` reads the identifier again.
#[derive(Debug)]
pub struct RevisionResolver<S> {
    source: S,
    revision: OnceCell<HardwareRevision>,
}

impl<S: SystemIdentifier> RevisionResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            revision: OnceCell::new(),
        }
    }

    pub fn resolve(&self) -> GpioResult<HardwareRevision> {
        if let Some(revision) = self.revision.get() {
            return Ok(*revision);
        }

        let identifier = self.source.read_system_identifier()?;
        let revision = classify(&identifier);
        debug!("system identifier {:?} classified as {:?}", identifier, revision);

        Ok(*self.revision.get_or_init(|| revision))
    }
}

/// Revision of the board this process runs on, read from `/proc/cpuinfo` on first successful use.
pub fn host_revision() -> GpioResult<HardwareRevision> {
    static HOST_REVISION: OnceLock<HardwareRevision> = OnceLock::new();

    if let Some(revision) = HOST_REVISION.get() {
        return Ok(*revision);
    }

    let revision = RevisionResolver::new(CpuInfo).resolve()?;
    Ok(*HOST_REVISION.get_or_init(|| revision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GpioError;
    use std::cell::Cell;

    #[test]
    fn classifies_revision_a_codes() {
        assert_eq!(classify("0002"), HardwareRevision::RevisionA);
        assert_eq!(classify("0003"), HardwareRevision::RevisionA);
        assert_eq!(classify("1000002"), HardwareRevision::RevisionA);
    }

    #[test]
    fn classifies_later_codes_as_revision_b() {
        assert_eq!(classify("000e"), HardwareRevision::RevisionB);
        assert_eq!(classify("0004"), HardwareRevision::RevisionB);
        assert_eq!(classify(" 1000000f\n"), HardwareRevision::RevisionB);
        assert_eq!(classify("a02082"), HardwareRevision::RevisionB);
    }

    #[test]
    fn rejects_unrecognized_identifiers() {
        assert_eq!(classify(""), HardwareRevision::Unknown);
        assert_eq!(classify("0001"), HardwareRevision::Unknown);
        assert_eq!(classify("beta"), HardwareRevision::Unknown);
        assert_eq!(classify("zz"), HardwareRevision::Unknown);
        assert_eq!(classify("zz0002"), HardwareRevision::Unknown);
        assert_eq!(classify("garbage0003"), HardwareRevision::Unknown);
        assert_eq!(classify("not-a-pi-000e"), HardwareRevision::Unknown);
        assert_eq!(classify("+004"), HardwareRevision::Unknown);
        assert_eq!(classify("00 02"), HardwareRevision::Unknown);
    }

    struct CountingIdentifier {
        reads: Cell<usize>,
        fail_first: Cell<bool>,
    }

    impl SystemIdentifier for CountingIdentifier {
        fn read_system_identifier(&self) -> GpioResult<String> {
            self.reads.set(self.reads.get() + 1);
            if self.fail_first.replace(false) {
                return Err(DeviceError::IdentifierUnreadable {
                    path: "/proc/cpuinfo".to_owned(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                }
                .into());
            }
            Ok("000f".to_owned())
        }
    }

    #[test]
    fn resolves_only_once() {
        let resolver = RevisionResolver::new(CountingIdentifier {
            reads: Cell::new(0),
            fail_first: Cell::new(false),
        });

        assert_eq!(resolver.resolve().unwrap(), HardwareRevision::RevisionB);
        assert_eq!(resolver.resolve().unwrap(), HardwareRevision::RevisionB);
        assert_eq!(resolver.source.reads.get(), 1);
    }

    #[test]
    fn surfaces_unreadable_identifiers_and_retries() {
        let resolver = RevisionResolver::new(CountingIdentifier {
            reads: Cell::new(0),
            fail_first: Cell::new(true),
        });

        assert!(matches!(
            resolver.resolve(),
            Err(GpioError::Device(DeviceError::IdentifierUnreadable { .. }))
        ));
        assert_eq!(resolver.resolve().unwrap(), HardwareRevision::RevisionB);
        assert_eq!(resolver.source.reads.get(), 2);
    }
}
