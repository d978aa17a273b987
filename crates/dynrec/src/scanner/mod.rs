//! Single-pass JSON field scanner.
//!
//! Why this exists
//! - Decoding a record only needs the raw byte span of each top-level member,
//!   not a parse tree. A table-driven lexer finds those spans in one pass at
//!   O(1) work per byte, which is what makes [`crate::RecordValue::merge_json`]
//!   cheaper than a generic recursive-descent decode.
//!
//! How it works
//! - [`ASCII_CLASS`] buckets every input byte into a lexical class. Bytes at or
//!   above 128 are treated as [`Class::CEtc`] without decoding: multi-byte
//!   UTF-8 only ever appears inside quoted strings, where any class other than
//!   quote/backslash is passed through, so the scanner never has to validate
//!   it.
//! - [`STATE_TRANSITION_TABLE`] maps the current grammar state and that class
//!   to either a successor state or a stack action (the `State` variants after
//!   `N3`). These are the classic Crockford JSON-checker tables, with the
//!   start row narrowed so that only an object may appear at top level.
//! - A push-down stack of [`Mode`]s tracks container nesting. `Mode::Done` is
//!   pushed once at construction as the bottom sentinel; popping past it is a
//!   syntax error.
//!
//! Span bookkeeping runs only while the stack is exactly one container above
//! the sentinel. That restricts emitted [`Kv`] pairs to direct members of the
//! outermost object: nested containers are consumed for well-formedness and
//! land inside a single member span.
//!
//! All failures collapse into the positionless [`ScanError`]; callers treat a
//! failed scan as a fatal decode error with no partial result.

use alloc::{borrow::Cow, vec::Vec};
use core::ops::Range;

use bstr::ByteSlice;

use crate::error::ScanError;


/// Lexical character classes.
///
/// `Invalid` marks the ASCII control bytes outside the JSON whitespace set;
/// classifying one aborts the scan immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    CSpace, // space
    CWhite, // other whitespace
    CLcurb, // {
    CRcurb, // }
    CLsqrb, // [
    CRsqrb, // ]
    CColon, // :
    CComma, // ,
    CQuote, // "
    CBacks, // \
    CSlash, // /
    CPlus,  // +
    CMinus, // -
    CPoint, // .
    CZero,  // 0
    CDigit, // 123456789
    CLowA,  // a
    CLowB,  // b
    CLowC,  // c
    CLowD,  // d
    CLowE,  // e
    CLowF,  // f
    CLowL,  // l
    CLowN,  // n
    CLowR,  // r
    CLowS,  // s
    CLowT,  // t
    CLowU,  // u
    CAbcdf, // ABCDF
    CE,     // E
    CEtc,   // everything else
    Invalid,
}

const NR_CLASSES: usize = 31;

const ___: Class = Class::Invalid;

/// Maps the 128 ASCII bytes into character classes. Bytes 128-255 are mapped
/// to `CEtc` directly by the scan loop. Non-whitespace control characters are
/// errors.
#[rustfmt::skip]
const ASCII_CLASS: [Class; 128] = {
    use Class::*;
    [
    ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,
    ___,    CWhite, CWhite, ___,    ___,    CWhite, ___,    ___,
    ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,
    ___,    ___,    ___,    ___,    ___,    ___,    ___,    ___,

    CSpace, CEtc,   CQuote, CEtc,   CEtc,   CEtc,   CEtc,   CEtc,
    CEtc,   CEtc,   CEtc,   CPlus,  CComma, CMinus, CPoint, CSlash,
    CZero,  CDigit, CDigit, CDigit, CDigit, CDigit, CDigit, CDigit,
    CDigit, CDigit, CColon, CEtc,   CEtc,   CEtc,   CEtc,   CEtc,

    CEtc,   CAbcdf, CAbcdf, CAbcdf, CAbcdf, CE,     CAbcdf, CEtc,
    CEtc,   CEtc,   CEtc,   CEtc,   CEtc,   CEtc,   CEtc,   CEtc,
    CEtc,   CEtc,   CEtc,   CEtc,   CEtc,   CEtc,   CEtc,   CEtc,
    CEtc,   CEtc,   CEtc,   CLsqrb, CBacks, CRsqrb, CEtc,   CEtc,

    CEtc,   CLowA,  CLowB,  CLowC,  CLowD,  CLowE,  CLowF,  CEtc,
    CEtc,   CEtc,   CEtc,   CEtc,   CLowL,  CEtc,   CLowN,  CEtc,
    CEtc,   CEtc,   CLowR,  CLowS,  CLowT,  CLowU,  CEtc,   CEtc,
    CEtc,   CEtc,   CEtc,   CLcurb, CEtc,   CRcurb, CEtc,   CEtc,
    ]
};

/// Lexer states plus the stack actions.
///
/// The variants up to `N3` are real grammar states and index the rows of
/// [`STATE_TRANSITION_TABLE`]. The variants after `N3` are the actions the
/// classic checker tables encode as negative numbers; they never become the
/// current state and are interpreted by the mode stack instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Go, // start
    Ok, // ok
    Ob, // object
    Ke, // key
    Co, // colon
    Va, // value
    Ar, // array
    St, // string
    Es, // escape
    U1, // u1
    U2, // u2
    U3, // u3
    U4, // u4
    Mi, // minus
    Ze, // zero
    In, // integer
    Fr, // fraction
    Fs, // fraction digits
    E1, // e
    E2, // e sign
    E3, // exponent
    T1, // tr
    T2, // tru
    T3, // true
    F1, // fa
    F2, // fal
    F3, // fals
    F4, // false
    N1, // nu
    N2, // nul
    N3, // null
    ColonSep,    // ':'  (-2)
    CommaSep,    // ','  (-3)
    QuoteEnd,    // closing '"'  (-4)
    ArrayOpen,   // '['  (-5)
    ObjectOpen,  // '{'  (-6)
    ArrayClose,  // ']'  (-7)
    ObjectClose, // '}'  (-8)
    EmptyClose,  // '}' directly after '{'  (-9)
    Invalid,
}

const NR_STATES: usize = 31;

const __: State = State::Invalid;
const OK: State = State::Ok;
const CL: State = State::ColonSep;
const CM: State = State::CommaSep;
const QE: State = State::QuoteEnd;
const AO: State = State::ArrayOpen;
const OO: State = State::ObjectOpen;
const AC: State = State::ArrayClose;
const OC: State = State::ObjectClose;
const EC: State = State::EmptyClose;

/// The state transition table takes the current state and the current class
/// and returns either a new state or an action. A document is accepted if at
/// the end of the input the state is `Ok` and only the `Done` sentinel remains
/// on the mode stack. Unlike the stock checker tables, the start row admits
/// only `{`: the outer value must be an object.
#[rustfmt::skip]
const STATE_TRANSITION_TABLE: [[State; NR_CLASSES]; NR_STATES] = {
    use State::{Ar, Co, E1, E2, E3, Es, F1, F2, F3, F4, Fr, Fs, Go, In, Ke,
                Mi, N1, N2, N3, Ob, St, T1, T2, T3, U1, U2, U3, U4, Va, Ze};
    [
/*
                 white                                      1-9                                   ABCDF  etc
             space |  {  }  [  ]  :  ,  "  \  /  +  -  .  0  |  a  b  c  d  e  f  l  n  r  s  t  u  |  E  |*/
/*start  Go*/ [Go, Go, OO, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*ok     Ok*/ [OK, OK, __, OC, __, AC, __, CM, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*object Ob*/ [Ob, Ob, __, EC, __, __, __, __, St, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*key    Ke*/ [Ke, Ke, __, __, __, __, __, __, St, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*colon  Co*/ [Co, Co, __, __, __, __, CL, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*value  Va*/ [Va, Va, OO, __, AO, __, __, __, St, __, __, __, Mi, __, Ze, In, __, __, __, __, __, F1, __, N1, __, __, T1, __, __, __, __],
/*array  Ar*/ [Ar, Ar, OO, __, AO, AC, __, __, St, __, __, __, Mi, __, Ze, In, __, __, __, __, __, F1, __, N1, __, __, T1, __, __, __, __],
/*string St*/ [St, __, St, St, St, St, St, St, QE, Es, St, St, St, St, St, St, St, St, St, St, St, St, St, St, St, St, St, St, St, St, St],
/*escape Es*/ [__, __, __, __, __, __, __, __, St, St, St, __, __, __, __, __, __, St, __, __, __, St, __, St, St, __, St, U1, __, __, __],
/*u1     U1*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, U2, U2, U2, U2, U2, U2, U2, U2, __, __, __, __, __, __, U2, U2, __],
/*u2     U2*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, U3, U3, U3, U3, U3, U3, U3, U3, __, __, __, __, __, __, U3, U3, __],
/*u3     U3*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, U4, U4, U4, U4, U4, U4, U4, U4, __, __, __, __, __, __, U4, U4, __],
/*u4     U4*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, St, St, St, St, St, St, St, St, __, __, __, __, __, __, St, St, __],
/*minus  Mi*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, Ze, In, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*zero   Ze*/ [OK, OK, __, OC, __, AC, __, CM, __, __, __, __, __, Fr, __, __, __, __, __, __, E1, __, __, __, __, __, __, __, __, E1, __],
/*int    In*/ [OK, OK, __, OC, __, AC, __, CM, __, __, __, __, __, Fr, In, In, __, __, __, __, E1, __, __, __, __, __, __, __, __, E1, __],
/*frac   Fr*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, Fs, Fs, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*fracs  Fs*/ [OK, OK, __, OC, __, AC, __, CM, __, __, __, __, __, __, Fs, Fs, __, __, __, __, E1, __, __, __, __, __, __, __, __, E1, __],
/*e      E1*/ [__, __, __, __, __, __, __, __, __, __, __, E2, E2, __, E3, E3, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*ex     E2*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, E3, E3, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*exp    E3*/ [OK, OK, __, OC, __, AC, __, CM, __, __, __, __, __, __, E3, E3, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*tr     T1*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, T2, __, __, __, __, __, __],
/*tru    T2*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, T3, __, __, __],
/*true   T3*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, OK, __, __, __, __, __, __, __, __, __, __],
/*fa     F1*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, F2, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/*fal    F2*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, F3, __, __, __, __, __, __, __, __],
/*fals   F3*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, F4, __, __, __, __, __],
/*false  F4*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, OK, __, __, __, __, __, __, __, __, __, __],
/*nu     N1*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, N2, __, __, __],
/*nul    N2*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, N3, __, __, __, __, __, __, __, __],
/*null   N3*/ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, OK, __, __, __, __, __, __, __, __],
    ]
};

/// Container modes trackable on the push-down stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Array,
    Done,
    Key,
    Object,
}

/// Mode stack with checked pops. `Done` sits at the bottom for the whole scan;
/// a pop that would underflow or that finds the wrong mode on top reports a
/// bracket-discipline error by returning `false`.
#[derive(Debug, Default)]
struct ModeStack(Vec<Mode>);

impl ModeStack {
    fn push(&mut self, mode: Mode) {
        self.0.push(mode);
    }

    fn pop(&mut self, expected: Mode) -> bool {
        match self.0.last() {
            Some(&top) if top == expected => {
                self.0.pop();
                true
            }
            _ => false,
        }
    }

    fn top(&self) -> Option<Mode> {
        self.0.last().copied()
    }

    fn depth(&self) -> usize {
        self.0.len()
    }
}

/// One member of the outermost object: the key text and the verbatim,
/// undecoded byte span of its value.
///
/// Both parts alias the scanned buffer, so a `Kv` is only valid while that
/// buffer lives; the borrow checker enforces the aliasing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kv<'a> {
    /// Raw key bytes between the quotes, converted to text. Escape sequences
    /// in the key are left exactly as written.
    pub key: Cow<'a, str>,
    /// Verbatim value bytes: a string keeps its surrounding quotes and
    /// escapes, a number or keyword is its literal spelling, a container runs
    /// from its opening bracket to the matching closing bracket inclusive.
    pub value: &'a [u8],
}

/// Scanner working state for one pass over one buffer. Nothing is retained
/// across calls; independent scans may run concurrently.
struct Scanner<'a> {
    data: &'a [u8],
    state: State,
    modes: ModeStack,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a [u8]) -> Self {
        let mut modes = ModeStack::default();
        modes.push(Mode::Done);
        Self {
            data,
            state: State::Go,
            modes,
        }
    }

    /// True while the scanner sits directly inside the outermost object, i.e.
    /// exactly one container above the `Done` sentinel. Span bookkeeping and
    /// emission only happen at this depth.
    fn at_member_depth(&self) -> bool {
        self.modes.depth() == 2
    }

    fn make_kv(&self, key: &Range<usize>, value: &Range<usize>) -> Kv<'a> {
        let data = self.data;
        Kv {
            key: data[key.start + 1..key.end - 1].to_str_lossy(),
            value: &data[value.start..value.end],
        }
    }

    /// True if the current state sits mid-number with a complete numeral
    /// behind it. A delimiter in one of these states terminates the numeral.
    fn in_number_tail(&self) -> bool {
        matches!(self.state, State::Ze | State::In | State::Fs | State::E3)
    }

    #[allow(clippy::too_many_lines)]
    fn run(mut self) -> Result<Vec<Kv<'a>>, ScanError> {
        let mut key: Range<usize> = 0..0;
        let mut val: Range<usize> = 0..0;
        let mut kvs: Vec<Kv<'a>> = Vec::new();

        for (idx, &byte) in self.data.iter().enumerate() {
            let class = if byte >= 128 {
                Class::CEtc
            } else {
                ASCII_CLASS[usize::from(byte)]
            };
            if class == Class::Invalid {
                return Err(ScanError);
            }

            let next = STATE_TRANSITION_TABLE[self.state as usize][class as usize];

            // Span bookkeeping for direct members of the outermost object.
            if self.at_member_depth() {
                match self.state {
                    // Opening quote of a key.
                    State::Ob | State::Ke => {
                        if next == State::St {
                            key.start = idx;
                        }
                    }
                    // First byte of a member value.
                    State::Va => {
                        if next != State::Va {
                            val.start = idx;
                        }
                    }
                    // Whitespace terminates a numeric member value.
                    State::Ze | State::In | State::Fs | State::E3 => {
                        if next == State::Ok {
                            val.end = idx;
                            kvs.push(self.make_kv(&key, &val));
                        }
                    }
                    // Final letter of a keyword member value.
                    State::T3 | State::F4 | State::N3 => {
                        if next == State::Ok {
                            val.end = idx + 1;
                            kvs.push(self.make_kv(&key, &val));
                        }
                    }
                    _ => {}
                }
            }

            match next {
                State::ObjectOpen => {
                    self.modes.push(Mode::Key);
                    self.state = State::Ob;
                }
                State::ArrayOpen => {
                    self.modes.push(Mode::Array);
                    self.state = State::Ar;
                }
                State::EmptyClose => {
                    if !self.modes.pop(Mode::Key) {
                        return Err(ScanError);
                    }
                    // An empty object that is itself a member value.
                    if self.at_member_depth() {
                        val.end = idx + 1;
                        kvs.push(self.make_kv(&key, &val));
                    }
                    self.state = State::Ok;
                }
                State::ObjectClose => {
                    // A numeric member value running straight into the
                    // outermost closing brace.
                    if self.at_member_depth() && self.in_number_tail() {
                        val.end = idx;
                        kvs.push(self.make_kv(&key, &val));
                    }
                    if !self.modes.pop(Mode::Object) {
                        return Err(ScanError);
                    }
                    // A nested object that is itself a member value.
                    if self.at_member_depth() {
                        val.end = idx + 1;
                        kvs.push(self.make_kv(&key, &val));
                    }
                    self.state = State::Ok;
                }
                State::ArrayClose => {
                    if !self.modes.pop(Mode::Array) {
                        return Err(ScanError);
                    }
                    // A nested array that is itself a member value.
                    if self.at_member_depth() {
                        val.end = idx + 1;
                        kvs.push(self.make_kv(&key, &val));
                    }
                    self.state = State::Ok;
                }
                State::QuoteEnd => match self.modes.top() {
                    // The closed string was a key.
                    Some(Mode::Key) => {
                        if self.at_member_depth() {
                            key.end = idx + 1;
                        }
                        self.state = State::Co;
                    }
                    // The closed string was a complete value.
                    Some(Mode::Array | Mode::Object) => {
                        if self.at_member_depth() {
                            val.end = idx + 1;
                            kvs.push(self.make_kv(&key, &val));
                        }
                        self.state = State::Ok;
                    }
                    _ => return Err(ScanError),
                },
                State::CommaSep => match self.modes.top() {
                    Some(Mode::Object) => {
                        // The comma terminates a numeric member value.
                        if self.at_member_depth() && self.in_number_tail() {
                            val.end = idx;
                            kvs.push(self.make_kv(&key, &val));
                        }
                        if !self.modes.pop(Mode::Object) {
                            return Err(ScanError);
                        }
                        self.modes.push(Mode::Key);
                        self.state = State::Ke;
                    }
                    Some(Mode::Array) => {
                        self.state = State::Va;
                    }
                    _ => return Err(ScanError),
                },
                State::ColonSep => {
                    if !self.modes.pop(Mode::Key) {
                        return Err(ScanError);
                    }
                    self.modes.push(Mode::Object);
                    self.state = State::Va;
                }
                State::Invalid => return Err(ScanError),
                next => self.state = next,
            }
        }

        if self.state == State::Ok && self.modes.pop(Mode::Done) {
            Ok(kvs)
        } else {
            Err(ScanError)
        }
    }
}

/// Scans one JSON document and returns the (key, raw value bytes) pair of
/// every member of the outermost object, in source order.
///
/// The document must be a single object; top-level arrays and scalars are
/// rejected. Nested containers inside member values are checked for
/// well-formedness but not decomposed. Any malformed input yields the single
/// generic [`ScanError`] and no pairs.
///
/// ```
/// use dynrec::scan;
///
/// let kvs = scan(br#"{"int8":123,"str":"789"}"#)?;
/// assert_eq!(kvs[0].key, "int8");
/// assert_eq!(kvs[0].value, b"123");
/// assert_eq!(kvs[1].value, br#""789""#);
/// # Ok::<(), dynrec::ScanError>(())
/// ```
pub fn scan(data: &[u8]) -> Result<Vec<Kv<'_>>, ScanError> {
    Scanner::new(data).run()
}
