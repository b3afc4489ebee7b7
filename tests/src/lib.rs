#[cfg(test)]
mod annotation_round_trip;
#[cfg(test)]
mod compilation_isolation;
#[cfg(test)]
mod longest_match_equivalence;
#[cfg(test)]
mod rendered_source;
