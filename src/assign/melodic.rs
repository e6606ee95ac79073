use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyboardSkin {
    Piano,
    Bright,
    ElectricGrand,
    HonkyTonk,
    Electric1,
    Electric2,
    Harpsichord,
    Clavichord,
    Celesta,
    Wood,
    SquareWave,
    SawWave,
    Chiff,
    Charang,
    BassAndLead,
    NewAge,
    Warm,
    Polysynth,
    Choir,
    Metallic,
    Synth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MalletType {
    Glockenspiel,
    Vibraphone,
    Marimba,
    Xylophone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccordionType {
    Accordion,
    Bandoneon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuitarType {
    Acoustic,
    Electric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BassGuitarType {
    Standard,
    Fretless,
    Synth1,
    Synth2,
}

/// Bowing style for the upright bass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BassPlayingStyle {
    Pizzicato,
    Arco,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStringsType {
    StringEnsemble1,
    StringEnsemble2,
    SynthStrings1,
    SynthStrings2,
    BowedSynth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStringBehavior {
    Normal,
    Tremolo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoirType {
    ChoirAahs,
    VoiceOohs,
    SynthVoice,
    VoiceSynth,
    HaloSynth,
    GoblinSynth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrumpetType {
    Normal,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageHornsType {
    BrassSection,
    SynthBrass1,
    SynthBrass2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipeSkin {
    Wood,
    Gold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceLaserType {
    Square,
    Saw,
}

/// Every melodic instrument variant the catalog can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MelodicKind {
    Keyboard(KeyboardSkin),
    FifthsKeyboard(KeyboardSkin),
    Mallets(MalletType),
    MusicBox,
    TubularBells,
    Accordion(AccordionType),
    Harmonica,
    Guitar(GuitarType),
    AcousticBass(BassPlayingStyle),
    BassGuitar(BassGuitarType),
    Violin,
    Viola,
    Cello,
    StageStrings(StageStringsType, StageStringBehavior),
    PizzicatoStrings,
    Harp,
    Timpani,
    StageChoir(ChoirType),
    Trumpet(TrumpetType),
    Trombone,
    Tuba,
    FrenchHorn,
    StageHorns(StageHornsType),
    SopranoSax,
    AltoSax,
    TenorSax,
    BaritoneSax,
    Oboe,
    Clarinet,
    Piccolo,
    Flute,
    Recorder,
    PanFlute(PipeSkin),
    BlownBottle,
    Whistles,
    Ocarina,
    SpaceLaser(SpaceLaserType),
    Banjo,
    Shamisen,
    Kalimba,
    Fiddle,
    TinkleBell,
    Agogos,
    SteelDrums,
    Woodblocks,
    TaikoDrum,
    MelodicTom,
    SynthDrum,
    ReverseCymbal,
    BirdTweet,
    TelephoneRing,
    Helicopter,
    ApplauseChoir,
}

/// What a General MIDI program number resolves to, before the notes
/// themselves are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramTarget {
    Direct(MelodicKind),
    /// Dense textures read as a pad, sparse ones as a lead voice.
    PolyphonySplit { pad: MelodicKind, lead: MelodicKind },
}

/// Held-note count above which a split program reads as a pad.
pub const PAD_POLYPHONY_THRESHOLD: usize = 4;

/// The melodic dispatch table: program number to instrument variant.
///
/// Unmapped programs resolve to `None` and produce nothing on screen.
pub fn program_target(program: u8) -> Option<ProgramTarget> {
    use MelodicKind::*;
    use ProgramTarget::{Direct, PolyphonySplit};

    let target = match program {
        0 => Direct(Keyboard(KeyboardSkin::Piano)),
        1 => Direct(Keyboard(KeyboardSkin::Bright)),
        2 => Direct(Keyboard(KeyboardSkin::ElectricGrand)),
        3 => Direct(Keyboard(KeyboardSkin::HonkyTonk)),
        4 => Direct(Keyboard(KeyboardSkin::Electric1)),
        5 => Direct(Keyboard(KeyboardSkin::Electric2)),
        6 => Direct(Keyboard(KeyboardSkin::Harpsichord)),
        7 => Direct(Keyboard(KeyboardSkin::Clavichord)),
        8 => Direct(Keyboard(KeyboardSkin::Celesta)),
        9 => Direct(Mallets(MalletType::Glockenspiel)),
        10 => Direct(MusicBox),
        11 => Direct(Mallets(MalletType::Vibraphone)),
        12 => Direct(Mallets(MalletType::Marimba)),
        13 => Direct(Mallets(MalletType::Xylophone)),
        14 | 98 => Direct(TubularBells),
        15..=20 | 55 => Direct(Keyboard(KeyboardSkin::Wood)),
        21 => Direct(Accordion(AccordionType::Accordion)),
        22 => Direct(Harmonica),
        23 => Direct(Accordion(AccordionType::Bandoneon)),
        24 | 25 => Direct(Guitar(GuitarType::Acoustic)),
        26..=31 | 120 => Direct(Guitar(GuitarType::Electric)),
        32 => Direct(AcousticBass(BassPlayingStyle::Pizzicato)),
        33 | 34 | 36 | 37 => Direct(BassGuitar(BassGuitarType::Standard)),
        35 => Direct(BassGuitar(BassGuitarType::Fretless)),
        38 => Direct(BassGuitar(BassGuitarType::Synth1)),
        39 => Direct(BassGuitar(BassGuitarType::Synth2)),
        40 => Direct(Violin),
        41 => Direct(Viola),
        42 => Direct(Cello),
        43 => Direct(AcousticBass(BassPlayingStyle::Arco)),
        44 => Direct(StageStrings(
            StageStringsType::StringEnsemble1,
            StageStringBehavior::Tremolo,
        )),
        45 => Direct(PizzicatoStrings),
        46 => Direct(Harp),
        47 => Direct(Timpani),
        48 => Direct(StageStrings(
            StageStringsType::StringEnsemble1,
            StageStringBehavior::Normal,
        )),
        49 => Direct(StageStrings(
            StageStringsType::StringEnsemble2,
            StageStringBehavior::Normal,
        )),
        50 => Direct(StageStrings(
            StageStringsType::SynthStrings1,
            StageStringBehavior::Normal,
        )),
        51 => Direct(StageStrings(
            StageStringsType::SynthStrings2,
            StageStringBehavior::Normal,
        )),
        52 => Direct(StageChoir(ChoirType::ChoirAahs)),
        53 => Direct(StageChoir(ChoirType::VoiceOohs)),
        54 => Direct(StageChoir(ChoirType::SynthVoice)),
        56 => Direct(Trumpet(TrumpetType::Normal)),
        57 => Direct(Trombone),
        58 => Direct(Tuba),
        59 => Direct(Trumpet(TrumpetType::Muted)),
        60 => Direct(FrenchHorn),
        61 => Direct(StageHorns(StageHornsType::BrassSection)),
        62 => Direct(StageHorns(StageHornsType::SynthBrass1)),
        63 => Direct(StageHorns(StageHornsType::SynthBrass2)),
        64 => Direct(SopranoSax),
        65 => Direct(AltoSax),
        66 => Direct(TenorSax),
        67 => Direct(BaritoneSax),
        68 => Direct(Oboe),
        71 => Direct(Clarinet),
        72 => Direct(Piccolo),
        73 => Direct(Flute),
        74 => Direct(Recorder),
        75 => Direct(PanFlute(PipeSkin::Wood)),
        76 => Direct(BlownBottle),
        78 => Direct(Whistles),
        79 => Direct(Ocarina),
        // square
        80 => PolyphonySplit {
            pad: Keyboard(KeyboardSkin::SquareWave),
            lead: SpaceLaser(SpaceLaserType::Square),
        },
        // sawtooth
        81 => PolyphonySplit {
            pad: Keyboard(KeyboardSkin::SawWave),
            lead: SpaceLaser(SpaceLaserType::Saw),
        },
        82 => Direct(PanFlute(PipeSkin::Gold)), // calliope
        83 => Direct(Keyboard(KeyboardSkin::Chiff)),
        84 => Direct(Keyboard(KeyboardSkin::Charang)),
        85 => Direct(StageChoir(ChoirType::VoiceSynth)),
        86 => Direct(FifthsKeyboard(KeyboardSkin::Synth)), // fifths
        87 => Direct(Keyboard(KeyboardSkin::BassAndLead)),
        88 => Direct(Keyboard(KeyboardSkin::NewAge)),
        89 => Direct(Keyboard(KeyboardSkin::Warm)),
        90 => Direct(Keyboard(KeyboardSkin::Polysynth)),
        91 => Direct(Keyboard(KeyboardSkin::Choir)),
        92 => Direct(StageStrings(
            StageStringsType::BowedSynth,
            StageStringBehavior::Normal,
        )),
        93 => Direct(Keyboard(KeyboardSkin::Metallic)),
        94 => Direct(StageChoir(ChoirType::HaloSynth)),
        // sweep, rain, soundtrack, atmosphere, brightness, echoes, sci-fi
        95 | 96 | 97 | 99 | 100 | 102 | 103 => Direct(Keyboard(KeyboardSkin::Synth)),
        101 => Direct(StageChoir(ChoirType::GoblinSynth)),
        105 => Direct(Banjo),
        106 => Direct(Shamisen),
        108 => Direct(Kalimba),
        110 => Direct(Fiddle),
        112 => Direct(TinkleBell),
        113 => Direct(Agogos),
        114 => Direct(SteelDrums),
        115 => Direct(Woodblocks),
        116 => Direct(TaikoDrum),
        117 => Direct(MelodicTom),
        118 => Direct(SynthDrum),
        119 => Direct(ReverseCymbal),
        121 => Direct(StageChoir(ChoirType::SynthVoice)),
        123 => Direct(BirdTweet),
        124 => Direct(TelephoneRing),
        125 => Direct(Helicopter),
        126 => Direct(ApplauseChoir),
        _ => return None,
    };
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_spot_checks() {
        assert_eq!(
            program_target(0),
            Some(ProgramTarget::Direct(MelodicKind::Keyboard(
                KeyboardSkin::Piano
            )))
        );
        assert_eq!(
            program_target(9),
            Some(ProgramTarget::Direct(MelodicKind::Mallets(
                MalletType::Glockenspiel
            )))
        );
        assert_eq!(
            program_target(56),
            Some(ProgramTarget::Direct(MelodicKind::Trumpet(
                TrumpetType::Normal
            )))
        );
        assert_eq!(
            program_target(120),
            Some(ProgramTarget::Direct(MelodicKind::Guitar(
                GuitarType::Electric
            )))
        );
    }

    #[test]
    fn split_programs_carry_both_targets() {
        let Some(ProgramTarget::PolyphonySplit { pad, lead }) = program_target(80) else {
            panic!("program 80 should be polyphony-split");
        };
        assert_eq!(pad, MelodicKind::Keyboard(KeyboardSkin::SquareWave));
        assert_eq!(lead, MelodicKind::SpaceLaser(SpaceLaserType::Square));
        assert!(matches!(
            program_target(81),
            Some(ProgramTarget::PolyphonySplit { .. })
        ));
    }

    #[test]
    fn unmapped_programs_resolve_to_nothing() {
        for program in [69, 70, 77, 104, 107, 109, 111, 122, 127] {
            assert_eq!(program_target(program), None, "program {program}");
        }
    }

    #[test]
    fn table_is_deterministic_over_the_full_range() {
        for program in 0..=127 {
            assert_eq!(program_target(program), program_target(program));
        }
    }
}
