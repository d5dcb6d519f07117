/// Gold, rose and violet tones shared by rockets and their debris.
pub const COLORS: [(u8, u8, u8); 11] = [
    (0xfb, 0xbf, 0x24), // amber
    (0xfd, 0xe6, 0x8a), // pale gold
    (0xec, 0x48, 0x99), // pink
    (0xf9, 0xa8, 0xd4), // blush
    (0xa7, 0x8b, 0xfa), // lavender
    (0x7c, 0x3a, 0xed), // violet
    (0xfb, 0x71, 0x85), // rose
    (0xff, 0xff, 0xff), // white
    (0xf4, 0x72, 0xb6), // orchid
    (0xc0, 0x84, 0xfc), // lilac
    (0xfc, 0xd3, 0x4d), // honey
];

pub fn random_color(rng: &mut fastrand::Rng) -> (u8, u8, u8) {
    COLORS[rng.usize(0..COLORS.len())]
}
