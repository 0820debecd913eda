//! Viterbi decoding for out-of-vocabulary spans.
//!
//! [`cut`] takes a buffer the dictionary route could not resolve, splits it
//! into CJK and non-CJK runs, decodes the CJK runs into BMES tags with the
//! constrained Viterbi recurrence and slices words at `E`/`S` boundaries.
//! Non-CJK runs are grouped by [`crate::chars::RE_SKIP`]: every regex match
//! is one token and every gap between matches is one token.
//!
//! With no emission data loaded (or the HMM disabled in the configuration)
//! the CJK branch degrades to emitting constituent characters; the regex
//! branch needs no probabilities and is unaffected.

use libhanseg_core::hmm::{HmmModel, State};

use crate::chars;

/// Decode a contiguous CJK buffer into BMES tags.
///
/// The first trellis column is `start + emission`; later columns take the
/// maximum over the state's legal predecessors of `previous + transition +
/// emission`, with every miss floored. Within a column a later predecessor
/// replaces the running best on equal scores. Termination compares the
/// final `E` and `S` scores and prefers `E` on a tie.
fn decode(hmm: &HmmModel, sentence: &[char]) -> Vec<State> {
    let n = sentence.len();
    debug_assert!(n > 0);

    let mut v = vec![[0.0f64; 4]; n];
    // back[t][s] is the predecessor of state s at position t (unused at 0)
    let mut back = vec![[State::B; 4]; n];

    for state in State::ALL {
        v[0][state.index()] = hmm.start(state) + hmm.emit(state, sentence[0]);
    }

    for t in 1..n {
        for state in State::ALL {
            let em = hmm.emit(state, sentence[t]);
            let mut best_prev = State::B;
            let mut best_score = f64::NEG_INFINITY;
            for prev in state.prev_states() {
                let score = hmm.trans(prev, state) + em + v[t - 1][prev.index()];
                if score >= best_score {
                    best_score = score;
                    best_prev = prev;
                }
            }
            v[t][state.index()] = best_score;
            back[t][state.index()] = best_prev;
        }
    }

    let prob_e = v[n - 1][State::E.index()];
    let prob_s = v[n - 1][State::S.index()];
    let mut state = if prob_e < prob_s { State::S } else { State::E };

    let mut tags = vec![state; n];
    for t in (1..n).rev() {
        state = back[t][state.index()];
        tags[t - 1] = state;
    }
    tags
}

/// Run Viterbi over a CJK buffer and append the sliced words to `out`.
pub fn viterbi(hmm: &HmmModel, sentence: &[char], out: &mut Vec<String>) {
    if sentence.is_empty() {
        return;
    }
    let tags = decode(hmm, sentence);

    let mut begin = 0;
    let mut next = 0;
    for (i, tag) in tags.iter().enumerate() {
        match tag {
            State::B => begin = i,
            State::E => {
                out.push(sentence[begin..=i].iter().collect());
                next = i + 1;
            }
            State::S => {
                out.push(sentence[i].to_string());
                next = i + 1;
            }
            State::M => {}
        }
    }
    // a decode ending mid-word leaves an unclosed suffix
    if next < sentence.len() {
        out.push(sentence[next..].iter().collect());
    }
}

/// Slice an unresolved buffer into tokens.
///
/// CJK runs go through the HMM when `hmm_active`, otherwise they surface
/// one character at a time. Non-CJK runs are grouped by `RE_SKIP`.
pub fn cut(hmm: &HmmModel, hmm_active: bool, sentence: &str, out: &mut Vec<String>) {
    let mut chinese: Vec<char> = Vec::new();
    let mut other = String::new();

    for ch in sentence.chars() {
        if chars::is_chinese(ch) {
            if !other.is_empty() {
                cut_other(&other, out);
                other.clear();
            }
            chinese.push(ch);
        } else {
            if !chinese.is_empty() {
                cut_chinese(hmm, hmm_active, &chinese, out);
                chinese.clear();
            }
            other.push(ch);
        }
    }
    if !chinese.is_empty() {
        cut_chinese(hmm, hmm_active, &chinese, out);
    } else {
        cut_other(&other, out);
    }
}

fn cut_chinese(hmm: &HmmModel, hmm_active: bool, run: &[char], out: &mut Vec<String>) {
    if hmm_active {
        viterbi(hmm, run, out);
    } else {
        out.extend(run.iter().map(|ch| ch.to_string()));
    }
}

fn cut_other(run: &str, out: &mut Vec<String>) {
    let mut offset = 0;
    for m in chars::RE_SKIP.find_iter(run) {
        if m.start() > offset {
            out.push(run[offset..m.start()].to_string());
        }
        out.push(m.as_str().to_string());
        offset = m.end();
    }
    if offset < run.len() {
        out.push(run[offset..].to_string());
    }
}
