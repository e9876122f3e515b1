//! Process-wide instrument and percussion catalogs.
//!
//! Each catalog is built once on first use, sorted by name, and never
//! mutated afterwards. Score rows refer to entries through [`CatalogRef`],
//! a `&'static` handle compared by identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ValueError;

/// Bank that holds General MIDI drum kits.
pub const PERCUSSION_BANK: i16 = 128;

#[derive(Debug, PartialEq, Eq)]
pub struct Instrument {
    pub name: &'static str,
    pub bank_number: i16,
    pub preset_number: i16,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PercussionSet {
    pub name: &'static str,
    pub bank_number: i16,
    pub preset_number: i16,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PercussionInstrument {
    pub name: &'static str,
    pub midi_number: i16,
}

/// An entry in one of the static catalogs.
pub trait CatalogEntry: fmt::Debug + Sync + Send + Sized + 'static {
    /// Human-readable catalog name, used in error messages.
    const CATALOG_NAME: &'static str;

    fn name(&self) -> &'static str;

    fn all() -> &'static [Self];
}

impl CatalogEntry for Instrument {
    const CATALOG_NAME: &'static str = "instrument";

    fn name(&self) -> &'static str {
        self.name
    }

    fn all() -> &'static [Self] {
        &INSTRUMENTS
    }
}

impl CatalogEntry for PercussionSet {
    const CATALOG_NAME: &'static str = "percussion set";

    fn name(&self) -> &'static str {
        self.name
    }

    fn all() -> &'static [Self] {
        &PERCUSSION_SETS
    }
}

impl CatalogEntry for PercussionInstrument {
    const CATALOG_NAME: &'static str = "percussion instrument";

    fn name(&self) -> &'static str {
        self.name
    }

    fn all() -> &'static [Self] {
        &PERCUSSION_INSTRUMENTS
    }
}

/// Identity handle into a static catalog.
pub struct CatalogRef<T: 'static>(&'static T);

pub type InstrumentRef = CatalogRef<Instrument>;
pub type PercussionSetRef = CatalogRef<PercussionSet>;
pub type PercussionInstrumentRef = CatalogRef<PercussionInstrument>;

impl<T: CatalogEntry> CatalogRef<T> {
    pub fn find(name: &str) -> Option<Self> {
        T::all().iter().find(|entry| entry.name() == name).map(CatalogRef)
    }

    pub fn named(name: &str) -> Result<Self, ValueError> {
        Self::find(name).ok_or_else(|| ValueError::UnknownName {
            catalog: T::CATALOG_NAME,
            name: name.to_string(),
        })
    }

    /// Handle to the entry at `index` in catalog order.
    pub fn at(index: usize) -> Option<Self> {
        T::all().get(index).map(CatalogRef)
    }

    /// Position of this entry in catalog order.
    pub fn index(self) -> usize {
        T::all()
            .iter()
            .position(|entry| std::ptr::eq(entry, self.0))
            .unwrap_or_default()
    }

    pub fn get(self) -> &'static T {
        self.0
    }

    pub fn name(self) -> &'static str {
        self.0.name()
    }
}

impl<T> Clone for CatalogRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CatalogRef<T> {}

impl<T> PartialEq for CatalogRef<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<T> Eq for CatalogRef<T> {}

impl<T> Hash for CatalogRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 as *const T as usize).hash(state);
    }
}

impl<T> Deref for CatalogRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.0
    }
}

impl<T: CatalogEntry> fmt::Debug for CatalogRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", T::CATALOG_NAME, self.0.name())
    }
}

impl<T: CatalogEntry> fmt::Display for CatalogRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

impl<T: CatalogEntry> Serialize for CatalogRef<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de, T: CatalogEntry> Deserialize<'de> for CatalogRef<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        CatalogRef::named(&name).map_err(serde::de::Error::custom)
    }
}

const GENERAL_MIDI_PROGRAMS: [&str; 128] = [
    "Acoustic Grand Piano",
    "Bright Acoustic Piano",
    "Electric Grand Piano",
    "Honky-tonk Piano",
    "Electric Piano 1",
    "Electric Piano 2",
    "Harpsichord",
    "Clavinet",
    "Celesta",
    "Glockenspiel",
    "Music Box",
    "Vibraphone",
    "Marimba",
    "Xylophone",
    "Tubular Bells",
    "Dulcimer",
    "Drawbar Organ",
    "Percussive Organ",
    "Rock Organ",
    "Church Organ",
    "Reed Organ",
    "Accordion",
    "Harmonica",
    "Tango Accordion",
    "Acoustic Guitar (nylon)",
    "Acoustic Guitar (steel)",
    "Electric Guitar (jazz)",
    "Electric Guitar (clean)",
    "Electric Guitar (muted)",
    "Overdriven Guitar",
    "Distortion Guitar",
    "Guitar Harmonics",
    "Acoustic Bass",
    "Electric Bass (finger)",
    "Electric Bass (pick)",
    "Fretless Bass",
    "Slap Bass 1",
    "Slap Bass 2",
    "Synth Bass 1",
    "Synth Bass 2",
    "Violin",
    "Viola",
    "Cello",
    "Contrabass",
    "Tremolo Strings",
    "Pizzicato Strings",
    "Orchestral Harp",
    "Timpani",
    "String Ensemble 1",
    "String Ensemble 2",
    "Synth Strings 1",
    "Synth Strings 2",
    "Choir Aahs",
    "Voice Oohs",
    "Synth Voice",
    "Orchestra Hit",
    "Trumpet",
    "Trombone",
    "Tuba",
    "Muted Trumpet",
    "French Horn",
    "Brass Section",
    "Synth Brass 1",
    "Synth Brass 2",
    "Soprano Sax",
    "Alto Sax",
    "Tenor Sax",
    "Baritone Sax",
    "Oboe",
    "English Horn",
    "Bassoon",
    "Clarinet",
    "Piccolo",
    "Flute",
    "Recorder",
    "Pan Flute",
    "Blown Bottle",
    "Shakuhachi",
    "Whistle",
    "Ocarina",
    "Lead 1 (square)",
    "Lead 2 (sawtooth)",
    "Lead 3 (calliope)",
    "Lead 4 (chiff)",
    "Lead 5 (charang)",
    "Lead 6 (voice)",
    "Lead 7 (fifths)",
    "Lead 8 (bass + lead)",
    "Pad 1 (new age)",
    "Pad 2 (warm)",
    "Pad 3 (polysynth)",
    "Pad 4 (choir)",
    "Pad 5 (bowed)",
    "Pad 6 (metallic)",
    "Pad 7 (halo)",
    "Pad 8 (sweep)",
    "FX 1 (rain)",
    "FX 2 (soundtrack)",
    "FX 3 (crystal)",
    "FX 4 (atmosphere)",
    "FX 5 (brightness)",
    "FX 6 (goblins)",
    "FX 7 (echoes)",
    "FX 8 (sci-fi)",
    "Sitar",
    "Banjo",
    "Shamisen",
    "Koto",
    "Kalimba",
    "Bagpipe",
    "Fiddle",
    "Shanai",
    "Tinkle Bell",
    "Agogo",
    "Steel Drums",
    "Woodblock",
    "Taiko Drum",
    "Melodic Tom",
    "Synth Drum",
    "Reverse Cymbal",
    "Guitar Fret Noise",
    "Breath Noise",
    "Seashore",
    "Bird Tweet",
    "Telephone Ring",
    "Helicopter",
    "Applause",
    "Gunshot",
];

// (name, preset) within the percussion bank
const GENERAL_MIDI_DRUM_KITS: [(&str, i16); 9] = [
    ("Standard", 0),
    ("Room", 8),
    ("Power", 16),
    ("Electronic", 24),
    ("TR-808", 25),
    ("Jazz", 32),
    ("Brush", 40),
    ("Orchestra", 48),
    ("SFX", 56),
];

/// General MIDI percussion key map, starting at key 35.
const GENERAL_MIDI_PERCUSSION_FIRST_KEY: i16 = 35;
const GENERAL_MIDI_PERCUSSION: [&str; 47] = [
    "Acoustic Bass Drum",
    "Bass Drum 1",
    "Side Stick",
    "Acoustic Snare",
    "Hand Clap",
    "Electric Snare",
    "Low Floor Tom",
    "Closed Hi-Hat",
    "High Floor Tom",
    "Pedal Hi-Hat",
    "Low Tom",
    "Open Hi-Hat",
    "Low-Mid Tom",
    "Hi-Mid Tom",
    "Crash Cymbal 1",
    "High Tom",
    "Ride Cymbal 1",
    "Chinese Cymbal",
    "Ride Bell",
    "Tambourine",
    "Splash Cymbal",
    "Cowbell",
    "Crash Cymbal 2",
    "Vibraslap",
    "Ride Cymbal 2",
    "Hi Bongo",
    "Low Bongo",
    "Mute Hi Conga",
    "Open Hi Conga",
    "Low Conga",
    "High Timbale",
    "Low Timbale",
    "High Agogo",
    "Low Agogo",
    "Cabasa",
    "Maracas",
    "Short Whistle",
    "Long Whistle",
    "Short Guiro",
    "Long Guiro",
    "Claves",
    "Hi Wood Block",
    "Low Wood Block",
    "Mute Cuica",
    "Open Cuica",
    "Mute Triangle",
    "Open Triangle",
];

static INSTRUMENTS: LazyLock<Vec<Instrument>> = LazyLock::new(|| {
    let mut instruments: Vec<Instrument> = GENERAL_MIDI_PROGRAMS
        .iter()
        .zip(0_i16..)
        .map(|(&name, preset_number)| Instrument {
            name,
            bank_number: 0,
            preset_number,
        })
        .collect();
    instruments.sort_by(|a, b| a.name.cmp(b.name));
    instruments
});

static PERCUSSION_SETS: LazyLock<Vec<PercussionSet>> = LazyLock::new(|| {
    let mut sets: Vec<PercussionSet> = GENERAL_MIDI_DRUM_KITS
        .iter()
        .map(|&(name, preset_number)| PercussionSet {
            name,
            bank_number: PERCUSSION_BANK,
            preset_number,
        })
        .collect();
    sets.sort_by(|a, b| a.name.cmp(b.name));
    sets
});

static PERCUSSION_INSTRUMENTS: LazyLock<Vec<PercussionInstrument>> = LazyLock::new(|| {
    let mut instruments: Vec<PercussionInstrument> = GENERAL_MIDI_PERCUSSION
        .iter()
        .zip(GENERAL_MIDI_PERCUSSION_FIRST_KEY..)
        .map(|(&name, midi_number)| PercussionInstrument { name, midi_number })
        .collect();
    instruments.sort_by(|a, b| a.name.cmp(b.name));
    instruments
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_are_sorted_and_complete() {
        assert_eq!(Instrument::all().len(), 128);
        assert_eq!(PercussionSet::all().len(), 9);
        assert_eq!(PercussionInstrument::all().len(), 47);
        assert!(Instrument::all().windows(2).all(|w| w[0].name < w[1].name));
    }

    #[test]
    fn lookup_by_name_returns_same_identity() {
        let a = InstrumentRef::named("Marimba").unwrap();
        let b = InstrumentRef::find("Marimba").unwrap();
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.get(), b.get()));
        assert_eq!(a.preset_number, 12);
        assert_eq!(a.bank_number, 0);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = InstrumentRef::named("Kazoo").unwrap_err();
        assert_eq!(err.to_string(), "unknown instrument \"Kazoo\"");
    }

    #[test]
    fn percussion_entries() {
        let tambourine = PercussionInstrumentRef::named("Tambourine").unwrap();
        assert_eq!(tambourine.midi_number, 54);
        let standard = PercussionSetRef::named("Standard").unwrap();
        assert_eq!(standard.bank_number, PERCUSSION_BANK);
        assert_eq!(standard.preset_number, 0);
    }

    #[test]
    fn index_round_trips() {
        let flute = InstrumentRef::named("Flute").unwrap();
        assert_eq!(InstrumentRef::at(flute.index()), Some(flute));
    }

    #[test]
    fn serializes_as_name() {
        let harp = InstrumentRef::named("Orchestral Harp").unwrap();
        assert_eq!(serde_json::to_string(&harp).unwrap(), "\"Orchestral Harp\"");
        let back: InstrumentRef = serde_json::from_str("\"Orchestral Harp\"").unwrap();
        assert_eq!(back, harp);
        assert!(serde_json::from_str::<InstrumentRef>("\"Nope\"").is_err());
    }
}
