/// Select the next batch of serialized documents starting at `offset`.
///
/// Scans forward while three conditions hold: payload budget remains, the
/// element cap is not reached, and input remains. The budget is tested before
/// each inclusion, so the first document of a chunk is always taken even when
/// it alone exceeds the budget; an oversized document therefore ships in a
/// chunk of its own, and no later document is admitted once the budget is
/// spent.
pub fn next_chunk<'a>(
    docs: &'a [String],
    offset: usize,
    max_size: usize,
    max_docs: usize,
) -> &'a [String] {
    if offset >= docs.len() {
        return &[];
    }

    let mut remaining = max_size as i64;
    let mut taken = 0;
    while remaining > 0 && taken < max_docs && offset + taken < docs.len() {
        remaining -= docs[offset + taken].len() as i64;
        taken += 1;
    }

    &docs[offset..offset + taken]
}
