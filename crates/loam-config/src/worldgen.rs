//! World-generation schema: noise modules, biomes, decorators and climate
//! classification, with the stock overworld as defaults.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Noise
// ---------------------------------------------------------------------------

/// Coherent-noise basis function for an octave stack.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NoiseBasis {
    Perlin,
    Simplex,
}

/// A composable noise module description.
///
/// Transforms wrap a source module; [`NoiseSpec::Ref`] names a module
/// declared earlier in [`crate::Config::noise`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum NoiseSpec {
    /// Sum of `octaves` layers of `basis`, normalized to roughly `[-1, 1]`.
    Octaves {
        basis: NoiseBasis,
        octaves: u32,
        frequency: f64,
        lacunarity: f64,
        persistence: f64,
        /// Added to the world seed to decorrelate this module.
        seed_offset: u64,
    },
    /// The same value everywhere.
    Constant(f64),
    /// Multiplies input coordinates per axis before sampling `source`.
    Scale {
        source: Box<NoiseSpec>,
        x: f64,
        y: f64,
        z: f64,
    },
    /// Adds a per-axis offset to input coordinates before sampling `source`.
    Translate {
        source: Box<NoiseSpec>,
        x: f64,
        y: f64,
        z: f64,
    },
    Add(Box<NoiseSpec>, Box<NoiseSpec>),
    Multiply(Box<NoiseSpec>, Box<NoiseSpec>),
    Ref(String),
}

/// A named entry in the noise module list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedNoise {
    pub name: String,
    pub spec: NoiseSpec,
}

impl NamedNoise {
    fn new(name: &str, spec: NoiseSpec) -> Self {
        Self {
            name: name.to_string(),
            spec,
        }
    }
}

fn scaled(source: &str, factor: f64) -> NoiseSpec {
    NoiseSpec::Scale {
        source: Box::new(NoiseSpec::Ref(source.to_string())),
        x: factor,
        y: factor,
        z: factor,
    }
}

/// The stock noise modules: an octave Perlin master and per-biome scalings of it.
pub fn default_noise() -> Vec<NamedNoise> {
    vec![
        NamedNoise::new(
            "master",
            NoiseSpec::Octaves {
                basis: NoiseBasis::Perlin,
                octaves: 6,
                frequency: 0.125,
                lacunarity: 2.0,
                persistence: 0.5,
                seed_offset: 0,
            },
        ),
        NamedNoise::new("ocean", scaled("master", 0.08)),
        NamedNoise::new("plains", scaled("master", 0.05)),
        NamedNoise::new("forest", scaled("master", 0.1)),
        NamedNoise::new("desert", scaled("master", 0.06)),
        NamedNoise::new("taiga", scaled("master", 0.1)),
        NamedNoise::new(
            "mountains",
            NoiseSpec::Add(
                Box::new(scaled("master", 0.2)),
                Box::new(NoiseSpec::Multiply(
                    Box::new(NoiseSpec::Octaves {
                        basis: NoiseBasis::Simplex,
                        octaves: 3,
                        frequency: 0.05,
                        lacunarity: 2.0,
                        persistence: 0.5,
                        seed_offset: 0x5EED,
                    }),
                    Box::new(NoiseSpec::Constant(0.25)),
                )),
            ),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Decorators
// ---------------------------------------------------------------------------

/// Tree shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TreeKind {
    Oak,
    Spruce,
}

/// One ore vein type placed by [`DecoratorConfig::Ore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OreVeinConfig {
    /// Block name of the ore.
    pub block: String,
    /// One attempt in `one_in` columns spawns a vein.
    pub one_in: u32,
    pub min_y: u32,
    pub max_y: u32,
    /// Maximum number of blocks in the vein walk.
    pub size: u32,
}

/// A decorator stage and its parameters.
///
/// Every `one_in` is a per-column chance of "one in N"; `0` disables the stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DecoratorConfig {
    Pond { one_in: u32 },
    Tree { one_in: u32, kind: TreeKind },
    Grass { one_in: u32, flower_one_in: u32 },
    Ore { veins: Vec<OreVeinConfig> },
    Cactus { one_in: u32, max_height: u32 },
}

fn vein(block: &str, one_in: u32, min_y: u32, max_y: u32, size: u32) -> OreVeinConfig {
    OreVeinConfig {
        block: block.to_string(),
        one_in,
        min_y,
        max_y,
        size,
    }
}

/// Stock ore veins, common and shallow to rare and deep.
pub fn default_ore_veins() -> Vec<OreVeinConfig> {
    vec![
        vein("coal_ore", 8, 5, 100, 8),
        vein("iron_ore", 12, 5, 60, 6),
        vein("gold_ore", 48, 5, 30, 5),
        vein("diamond_ore", 128, 2, 14, 4),
    ]
}

// ---------------------------------------------------------------------------
// Biomes
// ---------------------------------------------------------------------------

/// A biome: its noise module, surface palette, height shaping and decorators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BiomeConfig {
    pub name: String,
    /// Name of a module in [`crate::Config::noise`].
    pub noise: String,
    /// Block at the surface height.
    pub surface: String,
    /// Block for the topsoil layers beneath the surface.
    pub filler: String,
    /// Replaces the surface block where the surface lies below sea level.
    pub underwater: String,
    pub topsoil_depth: u32,
    /// Height where density crosses zero for a zero noise sample.
    pub base_height: f64,
    /// Density contribution of a unit noise sample, in blocks.
    pub height_variation: f64,
    /// Decorators in execution order.
    pub decorators: Vec<DecoratorConfig>,
}

#[allow(clippy::too_many_arguments)]
fn biome(
    name: &str,
    surface: &str,
    filler: &str,
    underwater: &str,
    topsoil_depth: u32,
    base_height: f64,
    height_variation: f64,
    decorators: Vec<DecoratorConfig>,
) -> BiomeConfig {
    BiomeConfig {
        name: name.to_string(),
        noise: name.to_string(),
        surface: surface.to_string(),
        filler: filler.to_string(),
        underwater: underwater.to_string(),
        topsoil_depth,
        base_height,
        height_variation,
        decorators,
    }
}

/// The stock biome set.
pub fn default_biomes() -> Vec<BiomeConfig> {
    let ores = || DecoratorConfig::Ore {
        veins: default_ore_veins(),
    };
    vec![
        biome("ocean", "sand", "sand", "gravel", 3, 46.0, 8.0, vec![ores()]),
        biome(
            "plains",
            "grass",
            "dirt",
            "sand",
            4,
            68.0,
            4.0,
            vec![
                DecoratorConfig::Pond { one_in: 64 },
                DecoratorConfig::Grass {
                    one_in: 3,
                    flower_one_in: 12,
                },
                DecoratorConfig::Tree {
                    one_in: 160,
                    kind: TreeKind::Oak,
                },
                ores(),
            ],
        ),
        biome(
            "forest",
            "grass",
            "dirt",
            "dirt",
            4,
            68.0,
            8.0,
            vec![
                DecoratorConfig::Pond { one_in: 48 },
                DecoratorConfig::Tree {
                    one_in: 12,
                    kind: TreeKind::Oak,
                },
                DecoratorConfig::Grass {
                    one_in: 6,
                    flower_one_in: 0,
                },
            ],
        ),
        biome(
            "desert",
            "sand",
            "sand",
            "sand",
            5,
            66.0,
            4.0,
            vec![
                DecoratorConfig::Cactus {
                    one_in: 40,
                    max_height: 3,
                },
                ores(),
            ],
        ),
        biome(
            "taiga",
            "grass",
            "dirt",
            "gravel",
            4,
            70.0,
            10.0,
            vec![
                DecoratorConfig::Tree {
                    one_in: 16,
                    kind: TreeKind::Spruce,
                },
                DecoratorConfig::Grass {
                    one_in: 10,
                    flower_one_in: 0,
                },
                ores(),
            ],
        ),
        biome(
            "mountains",
            "grass",
            "dirt",
            "gravel",
            2,
            80.0,
            30.0,
            vec![
                DecoratorConfig::Tree {
                    one_in: 48,
                    kind: TreeKind::Spruce,
                },
                ores(),
            ],
        ),
    ]
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A rectangle in climate space, `[min, max)` per axis with `1.0` inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    pub biome: String,
    pub temperature: (f64, f64),
    pub humidity: (f64, f64),
}

/// Climate-to-biome classification rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    pub regions: Vec<RegionConfig>,
    /// Overlap resolution: the earliest biome in this list wins.
    pub priority: Vec<String>,
    /// Biome for points no region covers.
    pub fallback: String,
}

fn region(biome: &str, temperature: (f64, f64), humidity: (f64, f64)) -> RegionConfig {
    RegionConfig {
        biome: biome.to_string(),
        temperature,
        humidity,
    }
}

/// The stock classification over the default biome set.
pub fn default_classifier() -> ClassifierConfig {
    ClassifierConfig {
        regions: vec![
            region("ocean", (0.0, 1.0), (0.8, 1.0)),
            region("taiga", (0.0, 0.35), (0.0, 0.8)),
            region("mountains", (0.35, 0.5), (0.0, 0.3)),
            region("desert", (0.65, 1.0), (0.0, 0.35)),
            region("plains", (0.35, 1.0), (0.0, 0.5)),
            region("forest", (0.35, 1.0), (0.5, 0.8)),
        ],
        priority: ["ocean", "mountains", "desert", "forest", "plains", "taiga"]
            .into_iter()
            .map(String::from)
            .collect(),
        fallback: "plains".to_string(),
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        default_classifier()
    }
}
