use crate::models::Song;

/// Built-in sample catalog, used when the backend is unreachable so the
/// rating flow still works offline.
pub fn sample_songs() -> Vec<Song> {
    const ENTRIES: [(u32, &str, &str, &str, &str); 10] = [
        (
            101,
            "Shape of You",
            "Ed Sheeran",
            "https://i.scdn.co/image/ab67616d0000b273ba5db46f4b838ef6027e6f96",
            "https://p.scdn.co/mp3-preview/3eb16018c2a700240e9dfb8817b6f2d041f15eb1",
        ),
        (
            102,
            "Blinding Lights",
            "The Weeknd",
            "https://i.scdn.co/image/ab67616d0000b2738863bc11d2aa12b54f5aeb36",
            "https://p.scdn.co/mp3-preview/e2f5edb569c73916235f2cadc8290b3dde522179",
        ),
        (
            103,
            "Dance Monkey",
            "Tones and I",
            "https://i.scdn.co/image/ab67616d0000b2739f39192ec5a1f04f7c08d9ab",
            "https://p.scdn.co/mp3-preview/74456889dc17ca44897559c14ec7de20f431dd82",
        ),
        (
            104,
            "Circles",
            "Post Malone",
            "https://i.scdn.co/image/ab67616d0000b27399e211c11052dcb57a592f6c",
            "https://p.scdn.co/mp3-preview/84a68eef8a7d26be04b81c21621f32adcf44b825",
        ),
        (
            105,
            "Watermelon Sugar",
            "Harry Styles",
            "https://i.scdn.co/image/ab67616d0000b273da5d5aeeabacacc1263c0f4b",
            "https://p.scdn.co/mp3-preview/8250dc653c7abe6e89552a22c30b52b4d7414b41",
        ),
        (
            106,
            "Bad Guy",
            "Billie Eilish",
            "https://i.scdn.co/image/ab67616d0000b273a91c10fe9472d9bd89802e5a",
            "https://p.scdn.co/mp3-preview/94278c37595c695fa5178c50a07ec84aff4a87e7",
        ),
        (
            107,
            "Don't Start Now",
            "Dua Lipa",
            "https://i.scdn.co/image/ab67616d0000b273bd26ede1ae69327010d49946",
            "https://p.scdn.co/mp3-preview/b3414442c1b791361a904eb74fc72796d2b0ea8e",
        ),
        (
            108,
            "Everything I Wanted",
            "Billie Eilish",
            "https://i.scdn.co/image/ab67616d0000b273a91c10fe9472d9bd89802e5a",
            "https://p.scdn.co/mp3-preview/f5e5c9bea97ed89086b73391ff26c6b13d6c0a3c",
        ),
        (
            109,
            "Memories",
            "Maroon 5",
            "https://i.scdn.co/image/ab67616d0000b273b25ef9c9015bdd771fbda74d",
            "https://p.scdn.co/mp3-preview/6e31fcf3cf65888b11ba9fb28e9c9d007698b17b",
        ),
        (
            110,
            "Someone You Loved",
            "Lewis Capaldi",
            "https://i.scdn.co/image/ab67616d0000b2733c65bbfd4c0f45af8c4b6e59",
            "https://p.scdn.co/mp3-preview/4fd6d07817c006591ecf162c3cd52e19a1df13e1",
        ),
    ];

    ENTRIES
        .iter()
        .map(|(id, title, artist, album_image, preview)| Song {
            id: *id,
            title: (*title).to_string(),
            artist: (*artist).to_string(),
            album_image_url: Some((*album_image).to_string()),
            preview_url: Some((*preview).to_string()),
            rating: None,
        })
        .collect()
}
