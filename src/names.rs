//! Fixed NAIF body and frame identifier tables
//!
//! Catalog entries refer to bodies and reference frames by NAIF integer id.
//! Lookup is total: an id outside the tables resolves to an explicit
//! unresolved value carrying the raw id, never an error.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

lazy_static! {
    /// Map from body id numbers to canonical names
    static ref BODY_NAMES: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        for &(id, name) in BODY_NAME_PAIRS.iter() {
            m.insert(id, name);
        }
        m
    };

    /// Map from reference-frame id numbers to canonical names
    static ref FRAME_NAMES: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        for &(id, name) in FRAME_NAME_PAIRS.iter() {
            m.insert(id, name);
        }
        m
    };
}

/// Get the name of a body given its id number
pub fn body_name(id: i32) -> Option<&'static str> {
    BODY_NAMES.get(&id).copied()
}

/// Get the name of a reference frame given its id number
pub fn frame_name(id: i32) -> Option<&'static str> {
    FRAME_NAMES.get(&id).copied()
}

/// A body reference from a catalog entry, resolved against the fixed table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Body {
    /// An id present in the table
    Known {
        /// NAIF id number
        id: i32,
        /// Canonical name
        name: &'static str,
    },
    /// An id absent from the table, passed through untouched
    Unresolved(i32),
}

impl Body {
    /// Resolve a raw id against the body table
    pub fn resolve(id: i32) -> Body {
        match body_name(id) {
            Some(name) => Body::Known { id, name },
            None => Body::Unresolved(id),
        }
    }

    /// The raw NAIF id
    pub fn id(&self) -> i32 {
        match *self {
            Body::Known { id, .. } => id,
            Body::Unresolved(id) => id,
        }
    }

    /// The canonical name, if the id is in the table
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Body::Known { name, .. } => Some(name),
            Body::Unresolved(_) => None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Body::Known { name, .. } => write!(f, "{}", name),
            Body::Unresolved(id) => write!(f, "BODY {}", id),
        }
    }
}

/// A reference-frame reference from a catalog entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    /// An id present in the table
    Known {
        /// NAIF frame id number
        id: i32,
        /// Canonical name
        name: &'static str,
    },
    /// An id absent from the table, passed through untouched
    Unresolved(i32),
}

impl Frame {
    /// Resolve a raw id against the frame table
    pub fn resolve(id: i32) -> Frame {
        match frame_name(id) {
            Some(name) => Frame::Known { id, name },
            None => Frame::Unresolved(id),
        }
    }

    /// The raw frame id
    pub fn id(&self) -> i32 {
        match *self {
            Frame::Known { id, .. } => id,
            Frame::Unresolved(id) => id,
        }
    }

    /// The canonical name, if the id is in the table
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Frame::Known { name, .. } => Some(name),
            Frame::Unresolved(_) => None,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Frame::Known { name, .. } => write!(f, "{}", name),
            Frame::Unresolved(id) => write!(f, "FRAME {}", id),
        }
    }
}

/// Pairs of (id, name) for bodies that appear in planetary kernels
const BODY_NAME_PAIRS: &[(i32, &str)] = &[
    (0, "SOLAR SYSTEM BARYCENTER"),
    (1, "MERCURY BARYCENTER"),
    (2, "VENUS BARYCENTER"),
    (3, "EARTH-MOON BARYCENTER"),
    (4, "MARS BARYCENTER"),
    (5, "JUPITER BARYCENTER"),
    (6, "SATURN BARYCENTER"),
    (7, "URANUS BARYCENTER"),
    (8, "NEPTUNE BARYCENTER"),
    (9, "PLUTO BARYCENTER"),
    (10, "SUN"),
    (199, "MERCURY"),
    (299, "VENUS"),
    (301, "MOON"),
    (399, "EARTH"),
    (401, "PHOBOS"),
    (402, "DEIMOS"),
    (499, "MARS"),
    (501, "IO"),
    (502, "EUROPA"),
    (503, "GANYMEDE"),
    (504, "CALLISTO"),
    (505, "AMALTHEA"),
    (506, "HIMALIA"),
    (507, "ELARA"),
    (599, "JUPITER"),
    (699, "SATURN"),
    (799, "URANUS"),
    (899, "NEPTUNE"),
    (901, "CHARON"),
    (999, "PLUTO"),
    (2000001, "CERES"),
    (2025143, "ITOKAWA"),
];

/// Pairs of (id, name) for inertial reference frames
const FRAME_NAME_PAIRS: &[(i32, &str)] = &[
    (1, "J2000"),
    (2, "B1950"),
    (3, "FK4"),
    (13, "GALACTIC"),
    (14, "DE200"),
    (15, "DE202"),
    (16, "MARSIAU"),
    (17, "ECLIPJ2000"),
    (18, "ECLIPB1950"),
    (19, "DE140"),
    (20, "DE142"),
    (21, "DE143"),
];
