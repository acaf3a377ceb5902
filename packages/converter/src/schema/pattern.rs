//! RELAX NG patterns and their derivatives.
//!
//! Validation follows the derivative algorithm: each event of the document
//! (start tag, attribute, end of attributes, text, end tag) transforms the
//! current pattern into the pattern that the rest of the document must
//! match. A pattern that reduces to `NotAllowed` signals an error.

use std::rc::Rc;

/// Name class of an element or attribute pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameClass {
    Name(String),
    AnyName,
    Choice(Box<NameClass>, Box<NameClass>),
}

impl NameClass {
    /// Whether `name` belongs to this class.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::Name(n) => n == name,
            Self::AnyName => true,
            Self::Choice(a, b) => a.contains(name) || b.contains(name),
        }
    }

    fn describe(&self, out: &mut Vec<String>) {
        match self {
            Self::Name(n) => out.push(n.clone()),
            Self::AnyName => out.push("*".to_string()),
            Self::Choice(a, b) => {
                a.describe(out);
                b.describe(out);
            }
        }
    }
}

/// A pattern. `Ref` points into the grammar's definitions and is
/// resolved lazily, which keeps recursive content models finite.
#[derive(Debug, PartialEq, Eq)]
pub enum Pattern {
    Empty,
    NotAllowed,
    Text,
    Choice(Rc<Pattern>, Rc<Pattern>),
    Interleave(Rc<Pattern>, Rc<Pattern>),
    Group(Rc<Pattern>, Rc<Pattern>),
    OneOrMore(Rc<Pattern>),
    Attribute(Rc<NameClass>, Rc<Pattern>),
    Element(Rc<NameClass>, Rc<Pattern>),
    Value(String),
    Ref(usize),
    After(Rc<Pattern>, Rc<Pattern>),
}

pub fn empty() -> Rc<Pattern> {
    Rc::new(Pattern::Empty)
}

pub fn not_allowed() -> Rc<Pattern> {
    Rc::new(Pattern::NotAllowed)
}

pub fn text() -> Rc<Pattern> {
    Rc::new(Pattern::Text)
}

pub fn choice(a: Rc<Pattern>, b: Rc<Pattern>) -> Rc<Pattern> {
    match (&*a, &*b) {
        (Pattern::NotAllowed, _) => b,
        (_, Pattern::NotAllowed) => a,
        (Pattern::Empty, Pattern::Empty) => a,
        _ if a == b => a,
        _ => Rc::new(Pattern::Choice(a, b)),
    }
}

pub fn group(a: Rc<Pattern>, b: Rc<Pattern>) -> Rc<Pattern> {
    match (&*a, &*b) {
        (Pattern::NotAllowed, _) | (_, Pattern::NotAllowed) => not_allowed(),
        (Pattern::Empty, _) => b,
        (_, Pattern::Empty) => a,
        _ => Rc::new(Pattern::Group(a, b)),
    }
}

pub fn interleave(a: Rc<Pattern>, b: Rc<Pattern>) -> Rc<Pattern> {
    match (&*a, &*b) {
        (Pattern::NotAllowed, _) | (_, Pattern::NotAllowed) => not_allowed(),
        (Pattern::Empty, _) => b,
        (_, Pattern::Empty) => a,
        _ => Rc::new(Pattern::Interleave(a, b)),
    }
}

pub fn after(a: Rc<Pattern>, b: Rc<Pattern>) -> Rc<Pattern> {
    match (&*a, &*b) {
        (Pattern::NotAllowed, _) | (_, Pattern::NotAllowed) => not_allowed(),
        _ => Rc::new(Pattern::After(a, b)),
    }
}

pub fn one_or_more(p: Rc<Pattern>) -> Rc<Pattern> {
    match &*p {
        Pattern::NotAllowed => p,
        _ => Rc::new(Pattern::OneOrMore(p)),
    }
}

pub fn optional(p: Rc<Pattern>) -> Rc<Pattern> {
    choice(p, empty())
}

pub fn zero_or_more(p: Rc<Pattern>) -> Rc<Pattern> {
    optional(one_or_more(p))
}

fn is_whitespace(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

type AfterFn<'a> = dyn Fn(Rc<Pattern>) -> Rc<Pattern> + 'a;

/// Derivative computations over a fixed set of definitions.
pub struct Deriver<'g> {
    defs: &'g [Rc<Pattern>],
}

impl<'g> Deriver<'g> {
    #[must_use]
    pub fn new(defs: &'g [Rc<Pattern>]) -> Self {
        Self { defs }
    }

    fn deref(&self, index: usize) -> Rc<Pattern> {
        self.defs.get(index).cloned().unwrap_or_else(not_allowed)
    }

    pub fn nullable(&self, p: &Pattern) -> bool {
        match p {
            Pattern::Empty | Pattern::Text => true,
            Pattern::Group(a, b) | Pattern::Interleave(a, b) => {
                self.nullable(a) && self.nullable(b)
            }
            Pattern::Choice(a, b) => self.nullable(a) || self.nullable(b),
            Pattern::OneOrMore(p) => self.nullable(p),
            Pattern::Ref(i) => self.nullable(&self.deref(*i)),
            Pattern::NotAllowed
            | Pattern::Attribute(..)
            | Pattern::Element(..)
            | Pattern::Value(_)
            | Pattern::After(..) => false,
        }
    }

    pub fn text_deriv(&self, p: &Rc<Pattern>, s: &str) -> Rc<Pattern> {
        match &**p {
            Pattern::Choice(a, b) => choice(self.text_deriv(a, s), self.text_deriv(b, s)),
            Pattern::Interleave(a, b) => choice(
                interleave(self.text_deriv(a, s), b.clone()),
                interleave(a.clone(), self.text_deriv(b, s)),
            ),
            Pattern::Group(a, b) => {
                let first = group(self.text_deriv(a, s), b.clone());
                if self.nullable(a) {
                    choice(first, self.text_deriv(b, s))
                } else {
                    first
                }
            }
            Pattern::After(a, b) => after(self.text_deriv(a, s), b.clone()),
            Pattern::OneOrMore(inner) => group(self.text_deriv(inner, s), optional(p.clone())),
            Pattern::Text => p.clone(),
            Pattern::Value(v) => {
                if normalize(v) == normalize(s) {
                    empty()
                } else {
                    not_allowed()
                }
            }
            Pattern::Ref(i) => self.text_deriv(&self.deref(*i), s),
            _ => not_allowed(),
        }
    }

    /// Rewrite the continuation of every `After` in `p` with `f`.
    fn apply_after(&self, p: &Rc<Pattern>, f: &AfterFn<'_>) -> Rc<Pattern> {
        match &**p {
            Pattern::After(a, b) => after(a.clone(), f(b.clone())),
            Pattern::Choice(a, b) => choice(self.apply_after(a, f), self.apply_after(b, f)),
            _ => not_allowed(),
        }
    }

    pub fn start_tag_open_deriv(&self, p: &Rc<Pattern>, name: &str) -> Rc<Pattern> {
        match &**p {
            Pattern::Choice(a, b) => choice(
                self.start_tag_open_deriv(a, name),
                self.start_tag_open_deriv(b, name),
            ),
            Pattern::Element(nc, content) => {
                if nc.contains(name) {
                    after(content.clone(), empty())
                } else {
                    not_allowed()
                }
            }
            Pattern::Interleave(a, b) => {
                let left = self.apply_after(&self.start_tag_open_deriv(a, name), &|x| {
                    interleave(x, b.clone())
                });
                let right = self.apply_after(&self.start_tag_open_deriv(b, name), &|x| {
                    interleave(a.clone(), x)
                });
                choice(left, right)
            }
            Pattern::OneOrMore(inner) => {
                let rest = optional(p.clone());
                self.apply_after(&self.start_tag_open_deriv(inner, name), &|x| {
                    group(x, rest.clone())
                })
            }
            Pattern::Group(a, b) => {
                let first = self.apply_after(&self.start_tag_open_deriv(a, name), &|x| {
                    group(x, b.clone())
                });
                if self.nullable(a) {
                    choice(first, self.start_tag_open_deriv(b, name))
                } else {
                    first
                }
            }
            Pattern::After(a, b) => {
                self.apply_after(&self.start_tag_open_deriv(a, name), &|x| after(x, b.clone()))
            }
            Pattern::Ref(i) => self.start_tag_open_deriv(&self.deref(*i), name),
            _ => not_allowed(),
        }
    }

    pub fn att_deriv(&self, p: &Rc<Pattern>, name: &str, value: &str) -> Rc<Pattern> {
        match &**p {
            Pattern::After(a, b) => after(self.att_deriv(a, name, value), b.clone()),
            Pattern::Choice(a, b) => {
                choice(self.att_deriv(a, name, value), self.att_deriv(b, name, value))
            }
            Pattern::Group(a, b) => choice(
                group(self.att_deriv(a, name, value), b.clone()),
                group(a.clone(), self.att_deriv(b, name, value)),
            ),
            Pattern::Interleave(a, b) => choice(
                interleave(self.att_deriv(a, name, value), b.clone()),
                interleave(a.clone(), self.att_deriv(b, name, value)),
            ),
            Pattern::OneOrMore(inner) => {
                group(self.att_deriv(inner, name, value), optional(p.clone()))
            }
            Pattern::Attribute(nc, content) => {
                if nc.contains(name) && self.value_matches(content, value) {
                    empty()
                } else {
                    not_allowed()
                }
            }
            Pattern::Ref(i) => self.att_deriv(&self.deref(*i), name, value),
            _ => not_allowed(),
        }
    }

    fn value_matches(&self, p: &Rc<Pattern>, s: &str) -> bool {
        (self.nullable(p) && is_whitespace(s)) || self.nullable(&self.text_deriv(p, s))
    }

    pub fn start_tag_close_deriv(&self, p: &Rc<Pattern>) -> Rc<Pattern> {
        match &**p {
            Pattern::After(a, b) => after(self.start_tag_close_deriv(a), b.clone()),
            Pattern::Choice(a, b) => {
                choice(self.start_tag_close_deriv(a), self.start_tag_close_deriv(b))
            }
            Pattern::Group(a, b) => {
                group(self.start_tag_close_deriv(a), self.start_tag_close_deriv(b))
            }
            Pattern::Interleave(a, b) => {
                interleave(self.start_tag_close_deriv(a), self.start_tag_close_deriv(b))
            }
            Pattern::OneOrMore(inner) => one_or_more(self.start_tag_close_deriv(inner)),
            Pattern::Attribute(..) => not_allowed(),
            Pattern::Ref(i) => {
                let target = self.deref(*i);
                if self.has_attributes(&target) {
                    self.start_tag_close_deriv(&target)
                } else {
                    p.clone()
                }
            }
            _ => p.clone(),
        }
    }

    /// Whether attributes are reachable without entering an element.
    fn has_attributes(&self, p: &Pattern) -> bool {
        match p {
            Pattern::Attribute(..) => true,
            Pattern::Choice(a, b)
            | Pattern::Group(a, b)
            | Pattern::Interleave(a, b)
            | Pattern::After(a, b) => self.has_attributes(a) || self.has_attributes(b),
            Pattern::OneOrMore(inner) => self.has_attributes(inner),
            Pattern::Ref(i) => self.has_attributes(&self.deref(*i)),
            _ => false,
        }
    }

    pub fn end_tag_deriv(&self, p: &Rc<Pattern>) -> Rc<Pattern> {
        match &**p {
            Pattern::Choice(a, b) => choice(self.end_tag_deriv(a), self.end_tag_deriv(b)),
            Pattern::After(a, b) => {
                if self.nullable(a) {
                    b.clone()
                } else {
                    not_allowed()
                }
            }
            _ => not_allowed(),
        }
    }

    /// The continuation after the current element, ignoring its content.
    ///
    /// Used to recover from an invalid element: validation resumes as if
    /// the element had matched.
    pub fn after_rest(&self, p: &Rc<Pattern>) -> Rc<Pattern> {
        match &**p {
            Pattern::After(_, b) => b.clone(),
            Pattern::Choice(a, b) => choice(self.after_rest(a), self.after_rest(b)),
            _ => not_allowed(),
        }
    }

    /// Element names that could start at `p`, for error messages.
    pub fn expected_elements(&self, p: &Pattern) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_expected(p, &mut names);
        names.sort();
        names.dedup();
        names
    }

    fn collect_expected(&self, p: &Pattern, out: &mut Vec<String>) {
        match p {
            Pattern::Element(nc, _) => nc.describe(out),
            Pattern::Choice(a, b) | Pattern::Interleave(a, b) => {
                self.collect_expected(a, out);
                self.collect_expected(b, out);
            }
            Pattern::Group(a, b) => {
                self.collect_expected(a, out);
                if self.nullable(a) {
                    self.collect_expected(b, out);
                }
            }
            Pattern::OneOrMore(inner) => self.collect_expected(inner, out),
            Pattern::After(a, _) => self.collect_expected(a, out),
            Pattern::Ref(i) => self.collect_expected(&self.deref(*i), out),
            _ => {}
        }
    }

    /// Names of required attributes still unmatched in `p`.
    pub fn missing_attributes(&self, p: &Pattern) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_missing_attributes(p, &mut names);
        names.sort();
        names.dedup();
        names
    }

    fn collect_missing_attributes(&self, p: &Pattern, out: &mut Vec<String>) {
        match p {
            Pattern::Attribute(nc, _) => nc.describe(out),
            Pattern::Group(a, b) | Pattern::Interleave(a, b) | Pattern::After(a, b) => {
                self.collect_missing_attributes(a, out);
                if !matches!(p, Pattern::After(..)) {
                    self.collect_missing_attributes(b, out);
                }
            }
            Pattern::Choice(a, b) => {
                // Optional attributes are a choice with empty.
                if !self.nullable(a) && !self.nullable(b) {
                    self.collect_missing_attributes(a, out);
                    self.collect_missing_attributes(b, out);
                }
            }
            Pattern::OneOrMore(inner) => self.collect_missing_attributes(inner, out),
            Pattern::Ref(i) => self.collect_missing_attributes(&self.deref(*i), out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, content: Rc<Pattern>) -> Rc<Pattern> {
        Rc::new(Pattern::Element(
            Rc::new(NameClass::Name(name.to_string())),
            content,
        ))
    }

    fn attribute(name: &str) -> Rc<Pattern> {
        Rc::new(Pattern::Attribute(
            Rc::new(NameClass::Name(name.to_string())),
            text(),
        ))
    }

    #[test]
    fn test_smart_constructors() {
        assert_eq!(*choice(not_allowed(), text()), Pattern::Text);
        assert_eq!(*group(empty(), text()), Pattern::Text);
        assert_eq!(*group(not_allowed(), text()), Pattern::NotAllowed);
        assert_eq!(*choice(text(), text()), Pattern::Text);
    }

    #[test]
    fn test_nullable() {
        let defs: Vec<Rc<Pattern>> = vec![];
        let d = Deriver::new(&defs);
        assert!(d.nullable(&zero_or_more(element("p", text()))));
        assert!(!d.nullable(&one_or_more(element("p", text()))));
        assert!(d.nullable(&group(text(), empty())));
    }

    #[test]
    fn test_element_sequence() {
        let defs: Vec<Rc<Pattern>> = vec![];
        let d = Deriver::new(&defs);
        let p = group(element("a", empty()), element("b", empty()));

        let opened = d.start_tag_open_deriv(&p, "a");
        let closed = d.start_tag_close_deriv(&opened);
        let rest = d.end_tag_deriv(&closed);
        assert!(!d.nullable(&rest));
        assert_eq!(d.expected_elements(&rest), vec!["b"]);

        assert_eq!(*d.start_tag_open_deriv(&p, "b"), Pattern::NotAllowed);
    }

    #[test]
    fn test_attribute_and_value() {
        let defs: Vec<Rc<Pattern>> = vec![];
        let d = Deriver::new(&defs);
        let typed = Rc::new(Pattern::Attribute(
            Rc::new(NameClass::Name("type".to_string())),
            Rc::new(Pattern::Value("AsciiMath".to_string())),
        ));
        let p = group(typed, text());
        assert!(d.nullable(&d.att_deriv(&p, "type", "AsciiMath")));
        assert_eq!(*d.att_deriv(&p, "type", "MathML"), Pattern::NotAllowed);

        let required = group(attribute("target"), text());
        assert_eq!(*d.start_tag_close_deriv(&required), Pattern::NotAllowed);
        assert_eq!(d.missing_attributes(&required), vec!["target"]);
    }

    #[test]
    fn test_ref_is_resolved_lazily() {
        // list = element li { ref list* }
        let defs = vec![element("li", zero_or_more(Rc::new(Pattern::Ref(0))))];
        let d = Deriver::new(&defs);
        let start = Rc::new(Pattern::Ref(0));
        let opened = d.start_tag_open_deriv(&start, "li");
        let inner = d.start_tag_open_deriv(&d.start_tag_close_deriv(&opened), "li");
        assert_ne!(*inner, Pattern::NotAllowed);
    }
}
