use std::fmt;

/// Hardware revision of the board, as far as the GPIO header layout is concerned.
///
/// Revision A boards (the very first Model B batches) route a few header positions to different
/// controller pins than every later board. The P5 auxiliary header only exists on revision B.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HardwareRevision {
    Unknown,
    RevisionA,
    RevisionB,
}

/// Physical header a position belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HeaderGroup {
    /// The main 26-pin header.
    P1,
    /// The 8-pin auxiliary header, revision B only.
    P5,
}

/// Pin slot on one of the board's physical headers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HeaderPosition {
    pub group: HeaderGroup,
    pub position: u8,
}

impl HeaderPosition {
    pub const fn p1(position: u8) -> Self {
        Self {
            group: HeaderGroup::P1,
            position,
        }
    }

    pub const fn p5(position: u8) -> Self {
        Self {
            group: HeaderGroup::P5,
            position,
        }
    }
}

impl fmt::Display for HeaderPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}-{}", self.group, self.position)
    }
}

/// Highest native pin exposed on any header.
pub const MAX_HEADER_NATIVE_PIN: u8 = 31;

/// Bidirectional mapping between header positions and native controller pins for one board revision.
///
/// Implementors only provide the header tables (index = position, `None` = power/ground/reserved slot).
/// The reverse lookup is derived from them, so both directions always agree.
pub trait PinMap: fmt::Debug + Send + Sync {
    fn revision(&self) -> HardwareRevision;

    /// Header tables, indexed by position. Index 0 is always unused.
    fn headers(&self) -> &'static [(HeaderGroup, &'static [Option<u8>])];

    fn header_to_native(&self, header: HeaderPosition) -> Option<u8> {
        self.headers()
            .iter()
            .find(|(group, _)| *group == header.group)
            .and_then(|(_, table)| table.get(header.position as usize).copied().flatten())
    }

    fn native_to_header(&self, native: u8) -> Option<HeaderPosition> {
        self.headers().iter().find_map(|(group, table)| {
            table
                .iter()
                .position(|slot| *slot == Some(native))
                .map(|position| HeaderPosition {
                    group: *group,
                    position: position as u8,
                })
        })
    }
}

#[rustfmt::skip]
const P1_REVISION_A: [Option<u8>; 27] = [
    None,
    None,     None,     Some(0),  None,     Some(1),  None,     Some(4),  Some(14), None,
    Some(15), Some(17), Some(18), Some(21), None,     Some(22), Some(23), None,     Some(24),
    Some(10), None,     Some(9),  Some(25), Some(11), Some(8),  None,     Some(7),
];

#[rustfmt::skip]
const P1_REVISION_B: [Option<u8>; 27] = [
    None,
    None,     None,     Some(2),  None,     Some(3),  None,     Some(4),  Some(14), None,
    Some(15), Some(17), Some(18), Some(27), None,     Some(22), Some(23), None,     Some(24),
    Some(10), None,     Some(9),  Some(25), Some(11), Some(8),  None,     Some(7),
];

#[rustfmt::skip]
const P5_REVISION_B: [Option<u8>; 9] = [
    None,
    None, None, Some(28), Some(29), Some(30), Some(31), None, None,
];

const REVISION_A_HEADERS: &[(HeaderGroup, &[Option<u8>])] = &[(HeaderGroup::P1, &P1_REVISION_A)];

const REVISION_B_HEADERS: &[(HeaderGroup, &[Option<u8>])] = &[
    (HeaderGroup::P1, &P1_REVISION_B),
    (HeaderGroup::P5, &P5_REVISION_B),
];

/// Header layout of revision A boards.
#[derive(Copy, Clone, Debug)]
pub struct RevisionA;

/// Header layout of revision B boards (and the 26-pin subset of all later boards).
#[derive(Copy, Clone, Debug)]
pub struct RevisionB;

impl PinMap for RevisionA {
    fn revision(&self) -> HardwareRevision {
        HardwareRevision::RevisionA
    }

    fn headers(&self) -> &'static [(HeaderGroup, &'static [Option<u8>])] {
        REVISION_A_HEADERS
    }
}

impl PinMap for RevisionB {
    fn revision(&self) -> HardwareRevision {
        HardwareRevision::RevisionB
    }

    fn headers(&self) -> &'static [(HeaderGroup, &'static [Option<u8>])] {
        REVISION_B_HEADERS
    }
}

/// Selects the pin map for a revision. There is no map for `Unknown`.
pub fn for_revision(revision: HardwareRevision) -> Option<&'static dyn PinMap> {
    match revision {
        HardwareRevision::RevisionA => Some(&RevisionA),
        HardwareRevision::RevisionB => Some(&RevisionB),
        HardwareRevision::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maps() -> [&'static dyn PinMap; 2] {
        [&RevisionA, &RevisionB]
    }

    #[test]
    fn header_to_native_round_trips() {
        for map in maps() {
            for (group, table) in map.headers() {
                for position in 0..table.len() as u8 {
                    let header = HeaderPosition {
                        group: *group,
                        position,
                    };
                    if let Some(native) = map.header_to_native(header) {
                        assert_eq!(map.native_to_header(native), Some(header));
                    }
                }
            }
        }
    }

    #[test]
    fn native_to_header_round_trips() {
        for map in maps() {
            for native in 0..=MAX_HEADER_NATIVE_PIN {
                if let Some(header) = map.native_to_header(native) {
                    assert_eq!(map.header_to_native(header), Some(native));
                }
            }
        }
    }

    #[test]
    fn power_and_ground_positions_have_no_pin() {
        for map in maps() {
            for position in [1, 2, 4, 6, 9, 14, 17, 20, 25] {
                assert_eq!(map.header_to_native(HeaderPosition::p1(position)), None);
            }
        }
    }

    #[test]
    fn revisions_differ_on_i2c_and_pin_13() {
        assert_eq!(RevisionA.header_to_native(HeaderPosition::p1(3)), Some(0));
        assert_eq!(RevisionB.header_to_native(HeaderPosition::p1(3)), Some(2));
        assert_eq!(RevisionA.header_to_native(HeaderPosition::p1(13)), Some(21));
        assert_eq!(RevisionB.header_to_native(HeaderPosition::p1(13)), Some(27));
        assert_eq!(RevisionB.native_to_header(21), None);
    }

    #[test]
    fn p5_header_exists_only_on_revision_b() {
        assert_eq!(RevisionB.native_to_header(28), Some(HeaderPosition::p5(3)));
        assert_eq!(RevisionB.native_to_header(31), Some(HeaderPosition::p5(6)));
        assert_eq!(RevisionA.header_to_native(HeaderPosition::p5(3)), None);
        assert_eq!(RevisionA.native_to_header(28), None);
    }

    #[test]
    fn out_of_table_positions_have_no_pin() {
        assert_eq!(RevisionB.header_to_native(HeaderPosition::p1(27)), None);
        assert_eq!(RevisionB.header_to_native(HeaderPosition::p5(200)), None);
    }

    #[test]
    fn selects_map_by_revision() {
        assert!(for_revision(HardwareRevision::Unknown).is_none());
        assert_eq!(
            for_revision(HardwareRevision::RevisionB).map(|m| m.revision()),
            Some(HardwareRevision::RevisionB)
        );
    }
}
