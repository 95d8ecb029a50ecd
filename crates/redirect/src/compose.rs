use bangs_index::SENTINEL;

/// Replace every sentinel byte in `template` with `query`.
///
/// A template without a sentinel comes back unchanged.
pub fn compose(template: &[u8], query: &[u8]) -> Vec<u8> {
    let slots = template.iter().filter(|&&b| b == SENTINEL).count();
    if slots == 0 {
        return template.to_vec();
    }

    let mut out = Vec::with_capacity(template.len() - slots + slots * query.len());
    for (i, part) in template.split(|&b| b == SENTINEL).enumerate() {
        if i > 0 {
            out.extend_from_slice(query);
        }
        out.extend_from_slice(part);
    }
    out
}
