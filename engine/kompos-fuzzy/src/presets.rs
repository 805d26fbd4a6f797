//! Shipped compost deployments with their field-tuned constants.
//!
//! Two engines are in production use: a numeric scorer that grades pile
//! quality from sensor readings, and a CF expert system that diagnoses
//! process problems from a mixed sensor/observation form. Both are
//! returned fully validated.

use kompos_core::{
    Combinator, FuzzySet, LabelOverride, QualityBand, Result, Rule, RuleTable, ScoringSpec,
    SetShape, Variable,
};

use crate::engine::FuzzyEngine;

/// Numeric odor level behind the observation form's choices. Unknown
/// choices read as the mild default.
pub fn odor_level(choice: &str) -> f64 {
    match choice {
        "Bau Busuk" => 9.0,
        "Cukup Bau" => 5.0,
        _ => 1.5,
    }
}

/// Antecedent triples (ph, suhu, kelembapan) and the status each grades to.
const QUALITY_RULES: [(&str, &str, &str, &str); 15] = [
    ("asam", "dingin", "basah", "buruk"),
    ("asam", "panas", "kering", "buruk"),
    ("basa", "dingin", "basah", "buruk"),
    ("basa", "panas", "kering", "buruk"),
    ("asam", "ideal", "basah", "buruk"),
    ("basa", "ideal", "basah", "buruk"),
    ("asam", "ideal", "sedang", "sedang"),
    ("basa", "ideal", "sedang", "sedang"),
    ("netral", "ideal", "basah", "sedang"),
    ("netral", "panas", "kering", "sedang"),
    ("asam", "panas", "sedang", "sedang"),
    ("netral", "ideal", "kering", "baik"),
    ("netral", "panas", "sedang", "baik"),
    ("netral", "dingin", "sedang", "baik"),
    ("netral", "ideal", "sedang", "sangat_baik"),
];

/// The compost quality scorer.
///
/// Reads `suhu` (°C), `kelembapan` (%), `ph`, `ammonia` (ppm) and `bau`
/// (0-10 level, see [`odor_level`]) and grades `status_kompos` on a 0-100
/// scale. High ammonia or a sharp odor vetoes the grade toward `buruk`,
/// and a fully pungent odor additionally forces the rot verdict and caps
/// the score at 40.
pub fn compost_quality() -> Result<FuzzyEngine> {
    let variables = vec![
        Variable::numeric(
            "suhu",
            0.0,
            80.0,
            vec![
                FuzzySet::new(
                    "dingin",
                    SetShape::RampLow {
                        shoulder: 28.0,
                        foot: 35.0,
                    },
                ),
                FuzzySet::new(
                    "ideal",
                    SetShape::Triangle {
                        left: 30.0,
                        peak: 45.0,
                        right: 55.0,
                    },
                ),
                FuzzySet::new(
                    "panas",
                    SetShape::RampHigh {
                        foot: 50.0,
                        shoulder: 60.0,
                    },
                ),
            ],
        ),
        Variable::numeric(
            "kelembapan",
            0.0,
            100.0,
            vec![
                FuzzySet::new(
                    "kering",
                    SetShape::RampLow {
                        shoulder: 30.0,
                        foot: 40.0,
                    },
                ),
                FuzzySet::new(
                    "sedang",
                    SetShape::Triangle {
                        left: 40.0,
                        peak: 46.0,
                        right: 52.0,
                    },
                ),
                FuzzySet::new(
                    "basah",
                    SetShape::RampHigh {
                        foot: 50.0,
                        shoulder: 60.0,
                    },
                ),
            ],
        ),
        Variable::numeric(
            "ph",
            0.0,
            14.0,
            vec![
                FuzzySet::new(
                    "asam",
                    SetShape::RampLow {
                        shoulder: 5.0,
                        foot: 6.0,
                    },
                ),
                FuzzySet::new(
                    "netral",
                    SetShape::Triangle {
                        left: 5.0,
                        peak: 7.0,
                        right: 9.0,
                    },
                ),
                FuzzySet::new(
                    "basa",
                    SetShape::RampHigh {
                        foot: 8.0,
                        shoulder: 9.0,
                    },
                ),
            ],
        ),
        Variable::numeric(
            "ammonia",
            0.0,
            50.0,
            vec![FuzzySet::new(
                "tinggi",
                SetShape::RampHigh {
                    foot: 25.0,
                    shoulder: 30.0,
                },
            )],
        ),
        Variable::numeric(
            "bau",
            0.0,
            10.0,
            vec![FuzzySet::new(
                "menyengat",
                SetShape::RampHigh {
                    foot: 6.0,
                    shoulder: 8.0,
                },
            )],
        ),
        Variable::scored(
            "status_kompos",
            ScoringSpec {
                min: 0.0,
                max: 100.0,
                step: 1.0,
                bands: vec![
                    QualityBand::new(45.0, "Buruk"),
                    QualityBand::new(75.0, "Sedang"),
                    QualityBand::new(92.0, "Baik"),
                    QualityBand::new(100.0, "Sangat Baik"),
                ],
                overrides: vec![LabelOverride {
                    variable: "bau".to_string(),
                    label: "menyengat".to_string(),
                    min_membership: 1.0,
                    forced_label: "Buruk (Indikasi Pembusukan)".to_string(),
                    score_cap: 40.0,
                }],
            },
            vec![
                FuzzySet::new(
                    "buruk",
                    SetShape::RampLow {
                        shoulder: 30.0,
                        foot: 50.0,
                    },
                ),
                FuzzySet::new(
                    "sedang",
                    SetShape::Triangle {
                        left: 40.0,
                        peak: 60.0,
                        right: 80.0,
                    },
                ),
                FuzzySet::new(
                    "baik",
                    SetShape::Triangle {
                        left: 70.0,
                        peak: 85.0,
                        right: 95.0,
                    },
                ),
                FuzzySet::new(
                    "sangat_baik",
                    SetShape::RampHigh {
                        foot: 90.0,
                        shoulder: 95.0,
                    },
                ),
            ],
        ),
    ];

    let mut rules: Vec<Rule> = QUALITY_RULES
        .iter()
        .enumerate()
        .map(|(i, (ph, suhu, kelembapan, status))| {
            Rule::new(format!("Q{}", i + 1))
                .when("ph", *ph)
                .when("suhu", *suhu)
                .when("kelembapan", *kelembapan)
                .then("status_kompos", *status)
        })
        .collect();
    rules.push(
        Rule::new("SAFE1")
            .when("ammonia", "tinggi")
            .when("bau", "menyengat")
            .with_combinator(Combinator::Or)
            .then("status_kompos", "buruk")
            .as_override(),
    );

    FuzzyEngine::new(variables, RuleTable::new(rules))
}

/// The compost diagnosis expert system.
///
/// Reads `suhu`, `kelembapan` and `lama_proses` (days) as numbers plus the
/// `bau`/`warna`/`tekstur`/`material` observation strings, and concludes
/// `Tingkat_Kematangan`, `Masalah_Deteksi` and `Aksi_Rekomendasi` with
/// certainty factors. The action rules condition on the other two
/// conclusions; run a second pass with a conclusion fed back in as a
/// reading to fire them.
pub fn compost_diagnosis() -> Result<FuzzyEngine> {
    let variables = vec![
        Variable::numeric(
            "suhu",
            0.0,
            100.0,
            vec![
                FuzzySet::new(
                    "Dingin",
                    SetShape::ShoulderLow {
                        threshold: 25.0,
                        height: 1.0,
                    },
                ),
                FuzzySet::new(
                    "Mesofilik",
                    SetShape::Trapezoid {
                        left: 25.0,
                        plateau_left: 35.0,
                        plateau_right: 45.0,
                        right: 45.0,
                        plateau: 1.0,
                    },
                ),
                FuzzySet::new(
                    "Termofilik",
                    SetShape::Trapezoid {
                        left: 45.0,
                        plateau_left: 55.0,
                        plateau_right: 65.0,
                        right: 65.0,
                        plateau: 1.0,
                    },
                ),
                FuzzySet::new(
                    "Terlalu_Panas",
                    SetShape::ShoulderHigh {
                        threshold: 65.0,
                        height: 1.0,
                    },
                ),
            ],
        ),
        Variable::numeric(
            "kelembapan",
            0.0,
            100.0,
            vec![
                FuzzySet::new(
                    "Kering",
                    SetShape::ShoulderLow {
                        threshold: 40.0,
                        height: 1.0,
                    },
                ),
                FuzzySet::new(
                    "Ideal",
                    SetShape::Trapezoid {
                        left: 40.0,
                        plateau_left: 50.0,
                        plateau_right: 60.0,
                        right: 60.0,
                        plateau: 1.0,
                    },
                ),
                FuzzySet::new(
                    "Basah",
                    SetShape::ShoulderHigh {
                        threshold: 60.0,
                        height: 1.0,
                    },
                ),
            ],
        ),
        Variable::numeric(
            "lama_proses",
            0.0,
            90.0,
            vec![
                FuzzySet::new(
                    "Baru",
                    SetShape::ShoulderLow {
                        threshold: 7.0,
                        height: 1.0,
                    },
                ),
                FuzzySet::new(
                    "Mengembang",
                    SetShape::Trapezoid {
                        left: 7.0,
                        plateau_left: 14.0,
                        plateau_right: 21.0,
                        right: 21.0,
                        plateau: 1.0,
                    },
                ),
                FuzzySet::new(
                    "Lama",
                    SetShape::ShoulderHigh {
                        threshold: 21.0,
                        height: 1.0,
                    },
                ),
            ],
        ),
        Variable::categorical(
            "bau",
            vec![
                categorical("Tanah", "Tanah"),
                categorical("Anyir_Amonia", "Anyir Amonia"),
                categorical("Busuk", "Busuk"),
                categorical("Manis", "Manis"),
            ],
        ),
        Variable::categorical(
            "warna",
            vec![
                categorical("Coklat_Muda", "Coklat Muda"),
                categorical("Coklat_Gelap", "Coklat Gelap"),
                categorical("Hitam", "Hitam"),
            ],
        ),
        Variable::categorical(
            "tekstur",
            vec![
                categorical("Kasar", "Kasar"),
                categorical("Agak_Halus", "Agak Halus"),
                categorical("Halus", "Halus"),
                categorical("Lengket", "Lengket"),
            ],
        ),
        Variable::categorical(
            "material",
            vec![
                categorical("Hijauan_Dominan", "Hijauan Dominan"),
                categorical("Sisa_Makanan_Dominan", "Sisa Makanan Dominan"),
                categorical("Campuran", "Campuran"),
                categorical("Ada_Kontaminan", "Ada Kontaminan (Plastik/Logam)"),
            ],
        ),
        Variable::concluded("Tingkat_Kematangan", &["Matang", "Mentah", "Mengembang"]),
        Variable::concluded(
            "Masalah_Deteksi",
            &[
                "Anaerobik",
                "Terlalu_Basah",
                "Terlalu_Kering",
                "Aerasi_Kurang",
                "Kontaminasi",
            ],
        ),
        Variable::concluded(
            "Aksi_Rekomendasi",
            &[
                "Tambah_Bulking_Agent",
                "Tambah_Air",
                "Balik_Kompos",
                "Buang_Kontaminan",
                "Tunggu",
            ],
        ),
    ];

    let rules = RuleTable::new(vec![
        // Maturity
        Rule::new("M1")
            .when("bau", "Tanah")
            .when("warna", "Hitam")
            .when("tekstur", "Halus")
            .when("lama_proses", "Lama")
            .then("Tingkat_Kematangan", "Matang")
            .with_weight(0.90),
        Rule::new("M2")
            .when("suhu", "Mesofilik")
            .when("lama_proses", "Baru")
            .then("Tingkat_Kematangan", "Mentah")
            .with_weight(0.85),
        Rule::new("M3")
            .when("suhu", "Termofilik")
            .when("lama_proses", "Mengembang")
            .then("Tingkat_Kematangan", "Mengembang")
            .with_weight(0.80),
        // Contaminated material can never be considered finished.
        Rule::new("M5")
            .when("material", "Ada_Kontaminan")
            .then("Tingkat_Kematangan", "Mentah")
            .with_weight(1.00)
            .as_override(),
        // Problem detection
        Rule::new("D1")
            .when("bau", "Anyir_Amonia")
            .then("Masalah_Deteksi", "Anaerobik")
            .with_weight(0.85)
            .with_combinator(Combinator::Or),
        Rule::new("D1_alt")
            .when("suhu", "Terlalu_Panas")
            .then("Masalah_Deteksi", "Anaerobik")
            .with_weight(0.85)
            .with_combinator(Combinator::Or),
        Rule::new("D2")
            .when("kelembapan", "Basah")
            .when("tekstur", "Lengket")
            .then("Masalah_Deteksi", "Terlalu_Basah")
            .with_weight(0.90),
        Rule::new("D3")
            .when("kelembapan", "Kering")
            .when("warna", "Coklat_Muda")
            .then("Masalah_Deteksi", "Terlalu_Kering")
            .with_weight(0.80),
        Rule::new("D4")
            .when("suhu", "Dingin")
            .when("lama_proses", "Lama")
            .then("Masalah_Deteksi", "Aerasi_Kurang")
            .with_weight(0.75),
        Rule::new("D5")
            .when("material", "Ada_Kontaminan")
            .then("Masalah_Deteksi", "Kontaminasi")
            .with_weight(0.95)
            .with_combinator(Combinator::Or),
        Rule::new("D5_alt")
            .when("tekstur", "Kasar")
            .then("Masalah_Deteksi", "Kontaminasi")
            .with_weight(0.95)
            .with_combinator(Combinator::Or),
        // Actions, fired on a second pass from fed-back conclusions.
        Rule::new("A1")
            .when("Masalah_Deteksi", "Terlalu_Basah")
            .then("Aksi_Rekomendasi", "Tambah_Bulking_Agent")
            .with_weight(0.90),
        Rule::new("A2")
            .when("Masalah_Deteksi", "Terlalu_Kering")
            .then("Aksi_Rekomendasi", "Tambah_Air")
            .with_weight(0.85),
        Rule::new("A3")
            .when("Masalah_Deteksi", "Anaerobik")
            .then("Aksi_Rekomendasi", "Balik_Kompos")
            .with_weight(0.90),
        Rule::new("A3_alt")
            .when("Masalah_Deteksi", "Aerasi_Kurang")
            .then("Aksi_Rekomendasi", "Balik_Kompos")
            .with_weight(0.90),
        Rule::new("A4")
            .when("Masalah_Deteksi", "Kontaminasi")
            .then("Aksi_Rekomendasi", "Buang_Kontaminan")
            .with_weight(1.00),
        Rule::new("A5")
            .when("Tingkat_Kematangan", "Mengembang")
            .then("Aksi_Rekomendasi", "Tunggu")
            .with_weight(0.80),
    ]);

    FuzzyEngine::new(variables, rules)
}

fn categorical(label: &str, value: &str) -> FuzzySet {
    FuzzySet::new(
        label,
        SetShape::Categorical {
            value: value.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kompos_core::Reading;

    #[test]
    fn both_presets_validate() {
        assert!(compost_quality().is_ok());
        assert!(compost_diagnosis().is_ok());
    }

    #[test]
    fn odor_levels_match_the_form_choices() {
        assert_eq!(odor_level("Bau Busuk"), 9.0);
        assert_eq!(odor_level("Cukup Bau"), 5.0);
        assert_eq!(odor_level("Tidak Bau"), 1.5);
        assert_eq!(odor_level("anything else"), 1.5);
    }

    #[test]
    fn quality_rule_table_covers_all_four_grades() {
        let grades: std::collections::BTreeSet<&str> =
            QUALITY_RULES.iter().map(|(_, _, _, grade)| *grade).collect();
        assert_eq!(grades.len(), 4);
        assert!(grades.contains("sangat_baik"));
    }

    #[test]
    fn diagnosis_handles_a_contaminated_pile() {
        let engine = compost_diagnosis().unwrap();
        let reading = Reading::new()
            .with("material", "Ada Kontaminan (Plastik/Logam)")
            .with("tekstur", "Kasar");
        let report = engine.infer(&reading);

        let problems = report.conclusions("Masalah_Deteksi").unwrap();
        // D5 and D5_alt both conclude contamination at 0.95.
        assert_eq!(problems["Kontaminasi"], 0.9975);

        let maturity = report.conclusions("Tingkat_Kematangan").unwrap();
        assert_eq!(maturity["Mentah"], 1.0);
    }
}
