//! Shared corpus fixtures.

use std::path::Path;

use sieve::MockEmbeddingProvider;

/// Query text used by [`scripted_embedder`]; embeds to `[1, 0]`.
pub const QUERY_TEXT: &str = "Low-cost soil moisture sensing with printed electrodes";

/// `(file name, body, similarity to the query)`.
pub const CORPUS: &[(&str, &str, f32)] = &[
    ("2019_irrigation.pdf", "Drip irrigation scheduling for smallholder farms", 0.62),
    ("2020_soil_sensors.pdf", "Capacitive soil moisture probes for field trials", 0.91),
    ("2021_crop_models.pdf", "Crop growth modelling under drought stress", 0.35),
    ("2022_printed_electronics.pdf", "Screen-printed electrodes for agricultural sensing", 0.78),
];

/// Unit vector at cosine `similarity` to `[1, 0]`.
pub fn at(similarity: f32) -> Vec<f32> {
    vec![similarity, (1.0 - similarity * similarity).sqrt()]
}

/// Writes [`CORPUS`] plus a non-eligible file into `dir`.
pub fn write_corpus(dir: &Path) {
    for (name, body, _) in CORPUS {
        std::fs::write(dir.join(name), body).unwrap();
    }
    std::fs::write(dir.join("README.txt"), "not a proposal").unwrap();
}

/// Embedder scripted so every corpus body lands at its listed similarity.
pub fn scripted_embedder() -> MockEmbeddingProvider {
    CORPUS.iter().fold(
        MockEmbeddingProvider::new(2).with_vector(QUERY_TEXT, vec![1.0, 0.0]),
        |embedder, (_, body, similarity)| embedder.with_vector(body, at(*similarity)),
    )
}
