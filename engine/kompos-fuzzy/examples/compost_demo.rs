//! Runs both compost deployments against sample readings.

use anyhow::Result;
use kompos_core::Reading;
use kompos_fuzzy::presets::{compost_diagnosis, compost_quality, odor_level};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Compost quality scorer ===");
    let quality = compost_quality()?;
    let readings = [
        ("healthy pile", "Tidak Bau", 27.25, 46.0, 5.82, 5.0),
        ("pungent pile", "Bau Busuk", 27.25, 46.0, 5.82, 5.0),
        ("ammonia spike", "Tidak Bau", 45.0, 46.0, 7.0, 35.0),
    ];
    for (name, odor, suhu, kelembapan, ph, ammonia) in readings {
        let reading = Reading::new()
            .with("suhu", suhu)
            .with("kelembapan", kelembapan)
            .with("ph", ph)
            .with("ammonia", ammonia)
            .with("bau", odor_level(odor));
        let report = quality.infer(&reading);
        match report.score("status_kompos") {
            Some(score) if score.conclusive => println!(
                "{name}: {:.2} / 100 -> {}",
                score.value,
                score.label.as_deref().unwrap_or("?")
            ),
            _ => println!("{name}: no rule fired"),
        }
    }

    println!();
    println!("=== Compost diagnosis ===");
    let diagnosis = compost_diagnosis()?;
    let observed = Reading::new()
        .with("suhu", 30.0)
        .with("kelembapan", 70.0)
        .with("lama_proses", 5.0)
        .with("bau", "Anyir Amonia")
        .with("tekstur", "Lengket")
        .with("material", "Campuran");

    let first = diagnosis.infer(&observed);
    for output in ["Tingkat_Kematangan", "Masalah_Deteksi"] {
        if let Some(conclusions) = first.conclusions(output) {
            println!("{output}:");
            for (label, cf) in conclusions {
                println!("  {label} (CF {cf:.4})");
            }
        }
    }

    // The action rules condition on the detected problem, so a second
    // pass with the conclusion fed back in fires them.
    if let Some((problem, cf)) = first.strongest_conclusion("Masalah_Deteksi") {
        println!("strongest problem: {problem} (CF {cf:.4})");
        let second = diagnosis.infer(&observed.with("Masalah_Deteksi", problem));
        if let Some(actions) = second.conclusions("Aksi_Rekomendasi") {
            println!("Aksi_Rekomendasi:");
            for (label, cf) in actions {
                println!("  {label} (CF {cf:.4})");
            }
        }
    }

    Ok(())
}
