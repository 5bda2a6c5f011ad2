use memchr::{memchr, memmem};
use smallvec::SmallVec;

use crate::pattern::ast::{AnyNode, BoolNode, CommandNode, LiteralNode, SequenceNode};

const SEPARATOR: u8 = b'/';

/// Candidate string shared by a whole matcher tree. The text is already
/// folded (separators unified, case folded when requested), so comparisons
/// are raw byte comparisons.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    text: &'a [u8],
}

impl<'a> MatchContext<'a> {
    fn len(&self) -> usize {
        self.text.len()
    }
}

/// Matches a folded candidate string against a command tree.
///
/// The matcher tree is rebuilt on every call: it carries per-call search
/// state (wildcard scan caches, anchor placements) that must not leak into
/// the compiled pattern, so concurrent calls on one pattern stay independent.
#[tracing::instrument(level = "trace", skip(root, text), fields(text_len = text.len() as u64))]
pub fn match_pattern(root: &CommandNode, text: &str) -> bool {
    let ctx = MatchContext { text: text.as_bytes() };
    let mut matcher = Matcher::build(root);
    matcher.matches(&ctx, 0, ctx.len())
}

/// Call-scoped mirror of the command tree. Each variant answers whether it
/// matches a half-open byte range of the candidate.
#[derive(Debug)]
enum Matcher<'p> {
    Literal(LiteralMatcher<'p>),
    Any(AnyMatcher<'p>),
    AnyPath(AnyPathMatcher),
    And(BoolMatcher<'p>),
    Or(BoolMatcher<'p>),
    Sequence(SequenceMatcher<'p>),
}

impl<'p> Matcher<'p> {
    fn build(node: &'p CommandNode) -> Matcher<'p> {
        match node {
            CommandNode::Literal(lit) => Matcher::Literal(LiteralMatcher { node: lit }),
            CommandNode::Any(any) => Matcher::Any(AnyMatcher {
                node: any,
                bad: None,
                good: None,
            }),
            CommandNode::AnyPath(path) => Matcher::AnyPath(AnyPathMatcher {
                inverse: path.inverse,
            }),
            CommandNode::And(node) => Matcher::And(BoolMatcher::build(node)),
            CommandNode::Or(node) => Matcher::Or(BoolMatcher::build(node)),
            CommandNode::Sequence(seq) => Matcher::Sequence(SequenceMatcher::build(seq)),
        }
    }

    fn matches(&mut self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        match self {
            Matcher::Literal(m) => m.matches(ctx, lo, hi),
            Matcher::Any(m) => m.matches(ctx, lo, hi),
            Matcher::AnyPath(m) => m.matches(ctx, lo, hi),
            Matcher::And(m) => m.matches_all(ctx, lo, hi),
            Matcher::Or(m) => m.matches_any(ctx, lo, hi),
            Matcher::Sequence(m) => m.matches(ctx, lo, hi),
        }
    }
}

#[derive(Debug)]
struct LiteralMatcher<'p> {
    node: &'p LiteralNode,
}

impl LiteralMatcher<'_> {
    fn matches(&self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        let text = self.node.text.as_bytes();
        let hit = hi - lo == text.len() && &ctx.text[lo..hi] == text;
        hit != self.node.inverse
    }
}

/// `*`: a separator-free fragment, optionally barring an "except" substring.
///
/// The first separator found ("bad") and the first except hit ("good") are
/// remembered; later probes over a range that covers a remembered index fail
/// without rescanning. During anchor backtracking the same region is probed
/// many times, so this keeps repeated scans close to linear overall.
#[derive(Debug)]
struct AnyMatcher<'p> {
    node: &'p AnyNode,
    bad: Option<usize>,
    good: Option<usize>,
}

impl AnyMatcher<'_> {
    fn matches(&mut self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        self.scan(ctx, lo, hi) != self.node.inverse
    }

    fn scan(&mut self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        if lo == hi {
            return true;
        }

        if let Some(bad) = self.bad
            && bad >= lo
            && bad < hi
        {
            return false;
        }
        if let Some(at) = memchr(SEPARATOR, &ctx.text[lo..hi]) {
            self.bad = Some(lo + at);
            return false;
        }

        if let Some(except) = &self.node.except {
            if let Some(good) = self.good
                && good >= lo
                && good + except.len() <= hi
            {
                return false;
            }
            if let Some(at) = memmem::find(&ctx.text[lo..hi], except.as_bytes()) {
                self.good = Some(lo + at);
                return false;
            }
        }

        true
    }
}

/// `**/`: zero or more whole path segments, trailing separator included.
#[derive(Debug)]
struct AnyPathMatcher {
    inverse: bool,
}

impl AnyPathMatcher {
    fn matches(&self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        let hit = if lo == hi {
            // Zero segments need a boundary: the string edge or a separator.
            lo == 0 || lo == ctx.len() || ctx.text[lo - 1] == SEPARATOR || ctx.text[lo] == SEPARATOR
        } else {
            (lo == 0 || ctx.text[lo - 1] == SEPARATOR)
                && (hi == ctx.len() || ctx.text[hi - 1] == SEPARATOR)
        };
        hit != self.inverse
    }
}

#[derive(Debug)]
struct BoolMatcher<'p> {
    children: Vec<Matcher<'p>>,
    inverse: bool,
}

impl<'p> BoolMatcher<'p> {
    fn build(node: &'p BoolNode) -> BoolMatcher<'p> {
        BoolMatcher {
            children: node.children.iter().map(Matcher::build).collect(),
            inverse: node.inverse,
        }
    }

    fn matches_all(&mut self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        let mut hit = true;
        for child in &mut self.children {
            if !child.matches(ctx, lo, hi) {
                hit = false;
                break;
            }
        }
        hit != self.inverse
    }

    fn matches_any(&mut self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        let mut hit = false;
        for child in &mut self.children {
            if child.matches(ctx, lo, hi) {
                hit = true;
                break;
            }
        }
        hit != self.inverse
    }
}

/// Decomposed sequence: a literal prefix and postfix matched once at the
/// ends, then alternating fixed anchors and variable gaps over the middle.
#[derive(Debug)]
struct SequenceMatcher<'p> {
    prefix: SmallVec<[&'p LiteralNode; 4]>,
    postfix: SmallVec<[&'p LiteralNode; 4]>,
    anchors: SmallVec<[&'p LiteralNode; 4]>,
    /// One entry per gap; `gaps.len() == anchors.len() + 1`.
    gaps: Vec<GapMatcher<'p>>,
    inverse: bool,
}

#[derive(Debug)]
enum GapMatcher<'p> {
    /// Adjacent anchors: the gap must be zero-width.
    Empty,
    Single(Matcher<'p>),
    Brute(BruteMatcher<'p>),
}

impl<'p> SequenceMatcher<'p> {
    fn build(seq: &'p SequenceNode) -> SequenceMatcher<'p> {
        let children = &seq.children;
        let mut first = 0usize;
        let mut last = children.len();

        let mut prefix: SmallVec<[&LiteralNode; 4]> = SmallVec::new();
        while first < last {
            if let CommandNode::Literal(lit) = &children[first]
                && !lit.inverse
            {
                prefix.push(lit);
                first += 1;
            } else {
                break;
            }
        }

        let mut postfix: SmallVec<[&LiteralNode; 4]> = SmallVec::new();
        while last > first {
            if let CommandNode::Literal(lit) = &children[last - 1]
                && !lit.inverse
            {
                postfix.push(lit);
                last -= 1;
            } else {
                break;
            }
        }
        postfix.reverse();

        let mut anchors: SmallVec<[&LiteralNode; 4]> = SmallVec::new();
        let mut gaps = Vec::new();
        let mut run: Vec<&CommandNode> = Vec::new();
        for child in &children[first..last] {
            if let CommandNode::Literal(lit) = child
                && !lit.inverse
            {
                gaps.push(close_run(&mut run));
                anchors.push(lit);
            } else {
                run.push(child);
            }
        }
        gaps.push(close_run(&mut run));

        SequenceMatcher {
            prefix,
            postfix,
            anchors,
            gaps,
            inverse: seq.inverse,
        }
    }

    fn matches(&mut self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        self.matches_inner(ctx, lo, hi) != self.inverse
    }

    fn matches_inner(&mut self, ctx: &MatchContext, mut lo: usize, mut hi: usize) -> bool {
        for lit in &self.prefix {
            let text = lit.text.as_bytes();
            if hi - lo < text.len() || &ctx.text[lo..lo + text.len()] != text {
                return false;
            }
            lo += text.len();
        }
        for lit in self.postfix.iter().rev() {
            let text = lit.text.as_bytes();
            if hi - lo < text.len() || &ctx.text[hi - text.len()..hi] != text {
                return false;
            }
            hi -= text.len();
        }

        solve(&self.anchors, &mut self.gaps, ctx, 0, lo, hi)
    }
}

fn close_run<'p>(run: &mut Vec<&'p CommandNode>) -> GapMatcher<'p> {
    match run.len() {
        0 => GapMatcher::Empty,
        1 => {
            let node = run.remove(0);
            GapMatcher::Single(Matcher::build(node))
        }
        _ => GapMatcher::Brute(BruteMatcher {
            elements: run
                .drain(..)
                .map(|node| BruteElement {
                    width: node.width(),
                    matcher: Matcher::build(node),
                })
                .collect(),
        }),
    }
}

fn gap_matches(gap: &mut GapMatcher, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
    match gap {
        GapMatcher::Empty => lo == hi,
        GapMatcher::Single(matcher) => matcher.matches(ctx, lo, hi),
        GapMatcher::Brute(brute) => brute.matches(ctx, lo, hi),
    }
}

/// First-fit anchor placement with backtracking.
///
/// Anchor `idx` is placed at the leftmost occurrence of its literal at or
/// after `lo`; if its gap or any anchor to its right cannot be satisfied,
/// the next occurrence is tried. Anchors to the right re-derive their own
/// first-fit positions on every retry.
fn solve(
    anchors: &[&LiteralNode],
    gaps: &mut [GapMatcher],
    ctx: &MatchContext,
    idx: usize,
    lo: usize,
    hi: usize,
) -> bool {
    if idx == anchors.len() {
        return gap_matches(&mut gaps[idx], ctx, lo, hi);
    }

    let needle = anchors[idx].text.as_bytes();
    if matches!(gaps[idx], GapMatcher::Empty) {
        // The anchor is pinned directly after the previous one.
        return lo + needle.len() <= hi
            && &ctx.text[lo..lo + needle.len()] == needle
            && solve(anchors, gaps, ctx, idx + 1, lo + needle.len(), hi);
    }

    let mut from = lo;
    while from + needle.len() <= hi {
        let Some(rel) = memmem::find(&ctx.text[from..hi], needle) else {
            break;
        };
        let at = from + rel;
        if gap_matches(&mut gaps[idx], ctx, lo, at)
            && solve(anchors, gaps, ctx, idx + 1, at + needle.len(), hi)
        {
            return true;
        }
        from = at + 1;
    }
    false
}

/// Variable region holding more than one element. The elements keep their
/// sequence order; the search is over where each one's slice ends. Bounded
/// elements take exactly their width, unbounded ones try every split.
#[derive(Debug)]
struct BruteMatcher<'p> {
    elements: Vec<BruteElement<'p>>,
}

#[derive(Debug)]
struct BruteElement<'p> {
    width: Option<usize>,
    matcher: Matcher<'p>,
}

impl BruteMatcher<'_> {
    fn matches(&mut self, ctx: &MatchContext, lo: usize, hi: usize) -> bool {
        split(&mut self.elements, ctx, lo, hi)
    }
}

fn split(elements: &mut [BruteElement], ctx: &MatchContext, lo: usize, hi: usize) -> bool {
    let Some((head, rest)) = elements.split_first_mut() else {
        return lo == hi;
    };
    match head.width {
        Some(width) => {
            lo + width <= hi
                && head.matcher.matches(ctx, lo, lo + width)
                && split(rest, ctx, lo + width, hi)
        }
        None => {
            for end in lo..=hi {
                if head.matcher.matches(ctx, lo, end) && split(rest, ctx, end, hi) {
                    return true;
                }
            }
            false
        }
    }
}
