//! Boundary Geometry
//!
//! Country outlines as GeoJSON-shaped polygons, the validity check applied
//! before a boundary is emitted, and the Feature/FeatureCollection types the
//! map front end consumes.

use crate::domain::errors::GeometryError;
use crate::domain::value_objects::FeatureStyle;
use serde::{Deserialize, Serialize};

/// A `[longitude, latitude]` position.
///
/// Extra ordinates (altitude) are accepted on read and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(ordinates: Vec<f64>) -> Result<Self, Self::Error> {
        match ordinates.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(format!(
                "position needs at least 2 ordinates, got {}",
                ordinates.len()
            )),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lon, p.lat]
    }
}

/// A closed linear ring; first and last positions are equal.
pub type Ring = Vec<Position>;

/// Polygon or multipolygon outline of one country.
///
/// Serializes to a GeoJSON geometry object
/// (`{"type": "Polygon", "coordinates": [...]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum BoundaryGeometry {
    /// Exterior ring followed by holes
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// Why a geometry failed the validity check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidityError {
    #[error("geometry has no polygons")]
    Empty,
    #[error("polygon has no rings")]
    EmptyPolygon,
    #[error("ring has {0} distinct positions, needs at least 4")]
    TooFewPositions(usize),
    #[error("ring is not closed")]
    UnclosedRing,
    #[error("coordinate is not finite")]
    NonFinite,
    #[error("ring encloses zero area")]
    ZeroArea,
    #[error("ring intersects itself")]
    SelfIntersection,
    #[error("hole crosses its exterior ring")]
    HoleCrossesShell,
    #[error("hole lies outside its exterior ring")]
    HoleOutsideShell,
    #[error("holes of one polygon overlap")]
    OverlappingHoles,
    #[error("multipolygon parts overlap")]
    OverlappingParts,
}

impl BoundaryGeometry {
    /// Read a GeoJSON geometry object.
    ///
    /// Only `Polygon` and `MultiPolygon` describe an outline; anything else
    /// (e.g. the `Point` a provider returns for an unmapped place) is
    /// rejected.
    pub fn from_geojson(value: &serde_json::Value) -> Result<Self, GeometryError> {
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();

        match kind {
            "Polygon" | "MultiPolygon" => Ok(Self::deserialize(value)?),
            other => Err(GeometryError::UnsupportedType(other.to_string())),
        }
    }

    /// Polygons making up this geometry, each as exterior ring + holes.
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Self::Polygon(rings) => vec![rings.as_slice()],
            Self::MultiPolygon(polygons) => polygons.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Total number of positions across every ring.
    pub fn position_count(&self) -> usize {
        self.polygons()
            .iter()
            .flat_map(|rings| rings.iter())
            .map(Vec::len)
            .sum()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check the geometry is a valid area.
    ///
    /// Every ring is closed, finite, has at least three distinct vertices,
    /// encloses area and does not cross or touch itself. Holes lie inside
    /// their exterior ring without crossing it or each other. Parts of a
    /// multipolygon may touch at points but their interiors do not overlap.
    pub fn validate(&self) -> Result<(), ValidityError> {
        let polygons = self.polygons();
        if polygons.is_empty() {
            return Err(ValidityError::Empty);
        }

        for rings in &polygons {
            if rings.is_empty() {
                return Err(ValidityError::EmptyPolygon);
            }
            for ring in rings.iter() {
                validate_ring(ring)?;
            }
            validate_holes(rings)?;
        }

        for (i, a) in polygons.iter().enumerate() {
            for b in &polygons[i + 1..] {
                if parts_overlap(a, b) {
                    return Err(ValidityError::OverlappingParts);
                }
            }
        }
        Ok(())
    }
}

fn validate_ring(ring: &[Position]) -> Result<(), ValidityError> {
    if ring.iter().any(|p| !p.lon.is_finite() || !p.lat.is_finite()) {
        return Err(ValidityError::NonFinite);
    }

    // Repeated consecutive vertices are legal and would otherwise look like
    // touching segments.
    let mut points: Vec<Position> = Vec::with_capacity(ring.len());
    for p in ring {
        if points.last() != Some(p) {
            points.push(*p);
        }
    }

    if points.first() != points.last() {
        return Err(ValidityError::UnclosedRing);
    }
    if points.len() < 4 {
        return Err(ValidityError::TooFewPositions(points.len()));
    }
    if self_intersects(&points) {
        return Err(ValidityError::SelfIntersection);
    }
    if signed_area(&points) == 0.0 {
        return Err(ValidityError::ZeroArea);
    }
    Ok(())
}

/// Holes must sit inside the shell and stay clear of each other. Rings
/// are already known to be individually valid.
fn validate_holes(rings: &[Ring]) -> Result<(), ValidityError> {
    let Some((shell, holes)) = rings.split_first() else {
        return Ok(());
    };

    for hole in holes {
        if rings_cross(shell, hole) {
            return Err(ValidityError::HoleCrossesShell);
        }
        // Boundaries do not cross, so one off-boundary point of the hole
        // tells which side of the shell the whole hole is on.
        match sample_point(hole, shell).map(|p| locate(p, shell)) {
            Some(PointLocation::Inside) => {}
            _ => return Err(ValidityError::HoleOutsideShell),
        }
    }

    for (i, a) in holes.iter().enumerate() {
        for b in &holes[i + 1..] {
            if rings_overlap(a, b) {
                return Err(ValidityError::OverlappingHoles);
            }
        }
    }
    Ok(())
}

/// Whether the interiors of two polygons (shell + holes) overlap. A part
/// lying inside another part's hole is fine.
fn parts_overlap(a: &[Ring], b: &[Ring]) -> bool {
    let (Some((shell_a, holes_a)), Some((shell_b, holes_b))) = (a.split_first(), b.split_first())
    else {
        return false;
    };

    if !bounds_touch(shell_a, shell_b) {
        return false;
    }
    if rings_cross(shell_a, shell_b) {
        return true;
    }

    let nested = |inner: &Ring, outer: &Ring, outer_holes: &[Ring]| {
        sample_point(inner, outer).map(|p| locate(p, outer)) == Some(PointLocation::Inside)
            && !outer_holes.iter().any(|hole| fits_inside(inner, hole))
    };
    nested(shell_b, shell_a, holes_a) || nested(shell_a, shell_b, holes_b)
}

/// Whether `inner` lies within `outer` without crossing it.
fn fits_inside(inner: &Ring, outer: &Ring) -> bool {
    !rings_cross(inner, outer)
        && sample_point(inner, outer).map(|p| locate(p, outer)) == Some(PointLocation::Inside)
}

/// Whether two simple rings share interior area.
fn rings_overlap(a: &Ring, b: &Ring) -> bool {
    if !bounds_touch(a, b) {
        return false;
    }
    if rings_cross(a, b) {
        return true;
    }
    let inside = |x: &Ring, y: &Ring| {
        sample_point(x, y).map(|p| locate(p, y)) == Some(PointLocation::Inside)
    };
    inside(a, b) || inside(b, a)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointLocation {
    Inside,
    Boundary,
    Outside,
}

/// Even-odd ray cast, with points on an edge reported as `Boundary`.
fn locate(p: Position, ring: &[Position]) -> PointLocation {
    let mut inside = false;
    for w in ring.windows(2) {
        let (a, b) = (w[0], w[1]);
        if orientation(a, b, p) == 0.0 && within_bounds(a, b, p) {
            return PointLocation::Boundary;
        }
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let x = a.lon + (p.lat - a.lat) * (b.lon - a.lon) / (b.lat - a.lat);
            if p.lon < x {
                inside = !inside;
            }
        }
    }
    if inside {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

/// First vertex, then first edge midpoint, of `ring` not on `other`'s
/// boundary.
fn sample_point(ring: &[Position], other: &[Position]) -> Option<Position> {
    let midpoints = ring
        .windows(2)
        .map(|w| Position::new((w[0].lon + w[1].lon) / 2.0, (w[0].lat + w[1].lat) / 2.0));
    ring.iter()
        .copied()
        .chain(midpoints)
        .find(|&p| locate(p, other) != PointLocation::Boundary)
}

fn bounds(ring: &[Position]) -> (f64, f64, f64, f64) {
    ring.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(min_lon, min_lat, max_lon, max_lat), p| {
            (min_lon.min(p.lon), min_lat.min(p.lat), max_lon.max(p.lon), max_lat.max(p.lat))
        },
    )
}

fn bounds_touch(a: &[Position], b: &[Position]) -> bool {
    let (a_min_lon, a_min_lat, a_max_lon, a_max_lat) = bounds(a);
    let (b_min_lon, b_min_lat, b_max_lon, b_max_lat) = bounds(b);
    a_min_lon <= b_max_lon && b_min_lon <= a_max_lon && a_min_lat <= b_max_lat && b_min_lat <= a_max_lat
}

/// Whether an edge of `a` properly crosses, or runs along, an edge of `b`.
/// Touching at isolated points does not count.
///
/// Same sweep as [`self_intersects`], comparing only edges from different
/// rings.
fn rings_cross(a: &[Position], b: &[Position]) -> bool {
    let segments: Vec<(bool, Position, Position)> = a
        .windows(2)
        .map(|w| (false, w[0], w[1]))
        .chain(b.windows(2).map(|w| (true, w[0], w[1])))
        .collect();
    let min_lon = |i: usize| segments[i].1.lon.min(segments[i].2.lon);
    let max_lon = |i: usize| segments[i].1.lon.max(segments[i].2.lon);

    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&x, &y| min_lon(x).total_cmp(&min_lon(y)));

    let mut active: Vec<usize> = Vec::new();
    for i in order {
        let start = min_lon(i);
        active.retain(|&j| max_lon(j) >= start);

        let (from_b, p1, p2) = segments[i];
        for &j in &active {
            let (other_b, q1, q2) = segments[j];
            if from_b != other_b && segments_cross(p1, p2, q1, q2) {
                return true;
            }
        }
        active.push(i);
    }
    false
}

/// Proper crossing, or collinear overlap of positive length.
fn segments_cross(p1: Position, p2: Position, q1: Position, q2: Position) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return true;
    }
    if d1 != 0.0 || d2 != 0.0 || q1 == q2 || p1 == p2 {
        return false;
    }

    // Collinear: compare extents along the dominant axis.
    let along_lon = (q2.lon - q1.lon).abs() >= (q2.lat - q1.lat).abs();
    let coord = |p: Position| if along_lon { p.lon } else { p.lat };
    let (p_lo, p_hi) = (coord(p1).min(coord(p2)), coord(p1).max(coord(p2)));
    let (q_lo, q_hi) = (coord(q1).min(coord(q2)), coord(q1).max(coord(q2)));
    p_hi.min(q_hi) > p_lo.max(q_lo)
}

fn signed_area(ring: &[Position]) -> f64 {
    ring.windows(2)
        .map(|w| w[0].lon * w[1].lat - w[1].lon * w[0].lat)
        .sum::<f64>()
        / 2.0
}

/// Sweep over segments ordered by min longitude; only segments whose
/// longitude spans overlap are compared.
fn self_intersects(ring: &[Position]) -> bool {
    let n = ring.len() - 1;
    let segment = |i: usize| (ring[i], ring[i + 1]);
    let min_lon = |i: usize| ring[i].lon.min(ring[i + 1].lon);
    let max_lon = |i: usize| ring[i].lon.max(ring[i + 1].lon);
    let adjacent = |i: usize, j: usize| (i + 1) % n == j || (j + 1) % n == i;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| min_lon(a).total_cmp(&min_lon(b)));

    let mut active: Vec<usize> = Vec::new();
    for i in order {
        let start = min_lon(i);
        active.retain(|&j| max_lon(j) >= start);

        let (p1, p2) = segment(i);
        for &j in &active {
            if adjacent(i, j) {
                continue;
            }
            let (q1, q2) = segment(j);
            if segments_intersect(p1, p2, q1, q2) {
                return true;
            }
        }
        active.push(i);
    }
    false
}

fn orientation(a: Position, b: Position, c: Position) -> f64 {
    (b.lon - a.lon) * (c.lat - a.lat) - (b.lat - a.lat) * (c.lon - a.lon)
}

fn within_bounds(a: Position, b: Position, p: Position) -> bool {
    p.lon >= a.lon.min(b.lon)
        && p.lon <= a.lon.max(b.lon)
        && p.lat >= a.lat.min(b.lat)
        && p.lat <= a.lat.max(b.lat)
}

fn segments_intersect(p1: Position, p2: Position, q1: Position, q2: Position) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_bounds(q1, q2, p1))
        || (d2 == 0.0 && within_bounds(q1, q2, p2))
        || (d3 == 0.0 && within_bounds(p1, p2, q1))
        || (d4 == 0.0 && within_bounds(p1, p2, q2))
}

/// Properties carried by a country feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub iso_code: String,
    pub style: FeatureStyle,
}

/// A GeoJSON Feature wrapping one country boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: FeatureProperties,
    pub geometry: BoundaryGeometry,
}

impl Feature {
    /// A country feature with the fixed map style.
    pub fn country(iso3: impl Into<String>, geometry: BoundaryGeometry) -> Self {
        Self {
            kind: "Feature".to_string(),
            properties: FeatureProperties {
                iso_code: iso3.into(),
                style: FeatureStyle::default(),
            },
            geometry,
        }
    }
}

/// A GeoJSON FeatureCollection of country features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    /// ISO codes of the features, in order.
    pub fn iso_codes(&self) -> Vec<&str> {
        self.features
            .iter()
            .map(|f| f.properties.iso_code.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
