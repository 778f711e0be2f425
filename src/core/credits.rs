// core/credits.rs
//
// Estimation locale du coût d'une génération, affichée à la confirmation du
// wizard. Le backend reste seul juge du débit réel.

/// Coût plancher d'une génération, quel que soit le script
pub const ESTIMATE_FLOOR: u32 = 6;

/// Nombre de caractères de script couverts par un crédit
pub const CHARS_PER_CREDIT: u32 = 120;

/// Estime le coût en crédits d'une génération vidéo.
/// Croissant avec la longueur du script et le nombre d'assets.
pub fn estimate_credits(script: &str, asset_count: u32) -> u32 {
    let chars = script.chars().count() as u32;
    let script_cost = chars.div_ceil(CHARS_PER_CREDIT).max(ESTIMATE_FLOOR);
    script_cost + asset_count
}
