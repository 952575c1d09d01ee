use strata_scene::mesh::Face;

/// Faces covered by one emitted hash word.
pub const FACE_HASH_BATCH: usize = 512;

/// 32 bit non-cryptographic mixer (Hsieh's SuperFastHash), folding `data`
/// into a running `hash`.
pub fn superfasthash(data: &[u8], mut hash: u32) -> u32 {
    let get16 = |i: usize| u32::from(data[i]) | (u32::from(data[i + 1]) << 8);

    let mut i = 0;
    let mut remaining = data.len();

    while remaining >= 4 {
        hash = hash.wrapping_add(get16(i));
        let tmp = (get16(i + 2) << 11) ^ hash;
        hash = (hash << 16) ^ tmp;
        hash = hash.wrapping_add(hash >> 11);

        i += 4;
        remaining -= 4;
    }

    match remaining {
        3 => {
            hash = hash.wrapping_add(get16(i));
            hash ^= hash << 16;
            hash ^= ((data[i + 2] as i8) as u32) << 18;
            hash = hash.wrapping_add(hash >> 11);
        }
        2 => {
            hash = hash.wrapping_add(get16(i));
            hash ^= hash << 11;
            hash = hash.wrapping_add(hash >> 17);
        }
        1 => {
            hash = hash.wrapping_add((data[i] as i8) as u32);
            hash ^= hash << 10;
            hash = hash.wrapping_add(hash >> 1);
        }
        _ => {}
    }

    hash ^= hash << 3;
    hash = hash.wrapping_add(hash >> 5);
    hash ^= hash << 4;
    hash = hash.wrapping_add(hash >> 17);
    hash ^= hash << 25;
    hash = hash.wrapping_add(hash >> 6);

    hash
}

/// Fold face topology down to one hash word per batch of 512 faces. Each
/// face contributes its index count followed by every vertex index; each
/// batch is seeded with the previous batch's word. A checksum, not the
/// topology itself: corruption is detectable, the faces are not
/// recoverable.
pub fn hash_faces(faces: &[Face]) -> Vec<u32> {
    let mut words = Vec::with_capacity(faces.len().div_ceil(FACE_HASH_BATCH));

    let mut seed = 0u32;
    for batch in faces.chunks(FACE_HASH_BATCH) {
        let mut hash = seed;
        for face in batch {
            hash = superfasthash(&(face.indices.len() as u32).to_le_bytes(), hash);
            for &index in &face.indices {
                hash = superfasthash(&index.to_le_bytes(), hash);
            }
        }
        words.push(hash);
        seed = hash;
    }

    words
}
