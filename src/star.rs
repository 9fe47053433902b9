use serde::{Deserialize, Serialize};

/// One row of the clean star table.
///
/// Every field is present: rows with a missing or unparseable required
/// field never make it past [`crate::normalize`].
/// Right ascension is in decimal hours, declination in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub name: String,
    pub constellation: String,
    pub right_ascension: f64,
    pub declination: f64,
    pub apparent_magnitude: f64,
    pub absolute_magnitude: f64,
    pub distance_light_year: f64,
    pub spectral_class: String,
}

impl StarRecord {
    /// Value of one of the numeric fields.
    pub fn value(&self, field: NumericField) -> f64 {
        match field {
            NumericField::RightAscension => self.right_ascension,
            NumericField::Declination => self.declination,
            NumericField::ApparentMagnitude => self.apparent_magnitude,
            NumericField::AbsoluteMagnitude => self.absolute_magnitude,
            NumericField::DistanceLightYear => self.distance_light_year,
        }
    }

    /// Classifier feature vector: `[right_ascension, declination]`.
    pub fn coordinates(&self) -> [f64; 2] {
        [self.right_ascension, self.declination]
    }
}

/// The numeric columns a user can filter and profile on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    RightAscension,
    Declination,
    ApparentMagnitude,
    AbsoluteMagnitude,
    DistanceLightYear,
}

impl NumericField {
    pub const ALL: [NumericField; 5] = [
        NumericField::RightAscension,
        NumericField::Declination,
        NumericField::ApparentMagnitude,
        NumericField::AbsoluteMagnitude,
        NumericField::DistanceLightYear,
    ];

    /// CSV column name.
    pub fn column(&self) -> &'static str {
        match self {
            NumericField::RightAscension => "right_ascension",
            NumericField::Declination => "declination",
            NumericField::ApparentMagnitude => "apparent_magnitude",
            NumericField::AbsoluteMagnitude => "absolute_magnitude",
            NumericField::DistanceLightYear => "distance_light_year",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::RightAscension => "Right Ascension",
            NumericField::Declination => "Declination",
            NumericField::ApparentMagnitude => "Apparent Magnitude",
            NumericField::AbsoluteMagnitude => "Absolute Magnitude",
            NumericField::DistanceLightYear => "Distance (light years)",
        }
    }

    /// Short key used on the command line and in controller events.
    pub fn key(&self) -> &'static str {
        match self {
            NumericField::RightAscension => "ra",
            NumericField::Declination => "dec",
            NumericField::ApparentMagnitude => "appmag",
            NumericField::AbsoluteMagnitude => "absmag",
            NumericField::DistanceLightYear => "dist",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Fields whose absence causes a raw row to be dropped during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Name,
    Constellation,
    RightAscension,
    Declination,
    ApparentMagnitude,
    AbsoluteMagnitude,
    DistanceLightYear,
    SpectralClass,
}

impl RequiredField {
    pub const ALL: [RequiredField; 8] = [
        RequiredField::Name,
        RequiredField::Constellation,
        RequiredField::RightAscension,
        RequiredField::Declination,
        RequiredField::ApparentMagnitude,
        RequiredField::AbsoluteMagnitude,
        RequiredField::DistanceLightYear,
        RequiredField::SpectralClass,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            RequiredField::Name => "name",
            RequiredField::Constellation => "constellation",
            RequiredField::RightAscension => "right_ascension",
            RequiredField::Declination => "declination",
            RequiredField::ApparentMagnitude => "apparent_magnitude",
            RequiredField::AbsoluteMagnitude => "absolute_magnitude",
            RequiredField::DistanceLightYear => "distance_light_year",
            RequiredField::SpectralClass => "spectral_class",
        }
    }
}

/// The 88 IAU constellations, in the order the explorer lists them.
pub static CONSTELLATIONS: [&str; 88] = [
    "Andromeda", "Antlia", "Apus", "Aquarius", "Aquila", "Ara", "Aries", "Auriga",
    "Boötes", "Caelum", "Camelopardalis", "Cancer", "Canes Venatici", "Canis Major",
    "Canis Minor", "Capricornus", "Carina", "Cassiopeia", "Centaurus", "Cepheus",
    "Cetus", "Chamaeleon", "Circinus", "Columba", "Coma Berenices", "Corona Australis",
    "Corona Borealis", "Corvus", "Crater", "Crux", "Cygnus", "Delphinus", "Dorado",
    "Draco", "Equuleus", "Eridanus", "Fornax", "Gemini", "Grus", "Hercules",
    "Horologium", "Hydra", "Hydrus", "Indus", "Lacerta", "Leo", "Leo Minor", "Lepus",
    "Libra", "Lupus", "Lynx", "Lyra", "Mensa", "Microscopium", "Monoceros", "Musca",
    "Norma", "Octans", "Ophiuchus", "Orion", "Pavo", "Pegasus", "Perseus", "Phoenix",
    "Pictor", "Pisces", "Piscis Austrinus", "Puppis", "Pyxis", "Reticulum", "Sagitta",
    "Sagittarius", "Scorpius", "Sculptor", "Scutum", "Serpens", "Sextans", "Taurus",
    "Telescopium", "Triangulum", "Triangulum Australe", "Tucana", "Ursa Major", "Ursa Minor",
    "Vela", "Virgo", "Volans", "Vulpecula",
];

/// `true` if `name` is one of the 88 canonical constellation names.
pub fn is_canonical_constellation(name: &str) -> bool {
    CONSTELLATIONS.contains(&name)
}
