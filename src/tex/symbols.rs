//! Static macro table: symbols, style wrappers and argument-taking functions.

use super::scan::Delim;
use crate::render::scripts::to_superscript;

/// An interpreted macro argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    /// How the argument was delimited in the source
    pub delim: Delim,
    /// Interpreted argument text
    pub text: String,
}

/// How many arguments a macro consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Whether a leading `[...]` argument is accepted
    pub optional: bool,
    /// Number of required arguments
    pub required: usize,
}

impl Arity {
    const NONE: Arity = Arity::new(false, 0);
    const ONE: Arity = Arity::new(false, 1);
    const TWO: Arity = Arity::new(false, 2);
    const OPTIONAL_ONE: Arity = Arity::new(true, 1);

    const fn new(optional: bool, required: usize) -> Self {
        Self { optional, required }
    }
}

/// What a known macro expands to.
#[derive(Clone, Copy)]
pub enum Expansion {
    /// Fixed replacement text
    Symbol(&'static str),
    /// The argument text unchanged
    Identity,
    /// Computed from the arguments
    Function(fn(&[Arg]) -> String),
}

/// A known macro.
#[derive(Clone, Copy)]
pub struct Macro {
    pub arity: Arity,
    pub expansion: Expansion,
}

impl Macro {
    const fn symbol(text: &'static str) -> Self {
        Self {
            arity: Arity::NONE,
            expansion: Expansion::Symbol(text),
        }
    }

    const fn identity() -> Self {
        Self {
            arity: Arity::ONE,
            expansion: Expansion::Identity,
        }
    }

    const fn function(arity: Arity, f: fn(&[Arg]) -> String) -> Self {
        Self {
            arity,
            expansion: Expansion::Function(f),
        }
    }

    /// Expand the macro with already-interpreted arguments.
    pub fn expand(&self, args: &[Arg]) -> String {
        match self.expansion {
            Expansion::Symbol(text) => text.to_string(),
            Expansion::Identity => args.iter().map(|a| a.text.as_str()).collect(),
            Expansion::Function(f) => f(args),
        }
    }
}

/// Operator names that render as their own name.
const FUNCTION_NAMES: &[&str] = &[
    "arccos", "arcsin", "arctan", "arg", "cos", "cosh", "cot", "coth", "csc", "deg", "det", "dim",
    "exp", "gcd", "hom", "inf", "ker", "lg", "lim", "liminf", "limsup", "ln", "log", "max", "min",
    "Pr", "sec", "sin", "sinh", "sup", "tan", "tanh",
];

/// Look up a macro by name (without the backslash).
pub fn lookup(name: &str) -> Option<Macro> {
    if let Some(op) = FUNCTION_NAMES.iter().find(|n| **n == name) {
        return Some(Macro::symbol(*op));
    }

    let m = match name {
        // lowercase greek
        "alpha" => Macro::symbol("α"),
        "beta" => Macro::symbol("β"),
        "gamma" => Macro::symbol("γ"),
        "delta" => Macro::symbol("δ"),
        "epsilon" => Macro::symbol("ϵ"),
        "varepsilon" => Macro::symbol("ε"),
        "zeta" => Macro::symbol("ζ"),
        "eta" => Macro::symbol("η"),
        "theta" => Macro::symbol("θ"),
        "vartheta" => Macro::symbol("ϑ"),
        "iota" => Macro::symbol("ι"),
        "kappa" => Macro::symbol("κ"),
        "lambda" => Macro::symbol("λ"),
        "mu" => Macro::symbol("μ"),
        "nu" => Macro::symbol("ν"),
        "xi" => Macro::symbol("ξ"),
        "omicron" => Macro::symbol("ο"),
        "pi" => Macro::symbol("π"),
        "varpi" => Macro::symbol("ϖ"),
        "rho" => Macro::symbol("ρ"),
        "varrho" => Macro::symbol("ϱ"),
        "sigma" => Macro::symbol("σ"),
        "varsigma" => Macro::symbol("ς"),
        "tau" => Macro::symbol("τ"),
        "upsilon" => Macro::symbol("υ"),
        "phi" => Macro::symbol("ϕ"),
        "varphi" => Macro::symbol("φ"),
        "chi" => Macro::symbol("χ"),
        "psi" => Macro::symbol("ψ"),
        "omega" => Macro::symbol("ω"),

        // uppercase greek
        "Gamma" => Macro::symbol("Γ"),
        "Delta" => Macro::symbol("Δ"),
        "Theta" => Macro::symbol("Θ"),
        "Lambda" => Macro::symbol("Λ"),
        "Xi" => Macro::symbol("Ξ"),
        "Pi" => Macro::symbol("Π"),
        "Sigma" => Macro::symbol("Σ"),
        "Upsilon" => Macro::symbol("Υ"),
        "Phi" => Macro::symbol("Φ"),
        "Psi" => Macro::symbol("Ψ"),
        "Omega" => Macro::symbol("Ω"),

        // binary operators and relations
        "times" => Macro::symbol("×"),
        "div" => Macro::symbol("÷"),
        "cdot" => Macro::symbol("⋅"),
        "pm" => Macro::symbol("±"),
        "mp" => Macro::symbol("∓"),
        "ast" => Macro::symbol("∗"),
        "star" => Macro::symbol("⋆"),
        "circ" => Macro::symbol("∘"),
        "bullet" => Macro::symbol("•"),
        "oplus" => Macro::symbol("⊕"),
        "otimes" => Macro::symbol("⊗"),
        "leq" | "le" => Macro::symbol("≤"),
        "geq" | "ge" => Macro::symbol("≥"),
        "neq" | "ne" => Macro::symbol("≠"),
        "approx" => Macro::symbol("≈"),
        "equiv" => Macro::symbol("≡"),
        "sim" => Macro::symbol("∼"),
        "simeq" => Macro::symbol("≃"),
        "cong" => Macro::symbol("≅"),
        "propto" => Macro::symbol("∝"),
        "ll" => Macro::symbol("≪"),
        "gg" => Macro::symbol("≫"),
        "in" => Macro::symbol("∈"),
        "notin" => Macro::symbol("∉"),
        "ni" => Macro::symbol("∋"),
        "subset" => Macro::symbol("⊂"),
        "supset" => Macro::symbol("⊃"),
        "subseteq" => Macro::symbol("⊆"),
        "supseteq" => Macro::symbol("⊇"),
        "cup" => Macro::symbol("∪"),
        "cap" => Macro::symbol("∩"),
        "setminus" => Macro::symbol("∖"),
        "perp" => Macro::symbol("⊥"),
        "parallel" => Macro::symbol("∥"),
        "mid" => Macro::symbol("∣"),

        // logic
        "forall" => Macro::symbol("∀"),
        "exists" => Macro::symbol("∃"),
        "neg" | "lnot" => Macro::symbol("¬"),
        "land" | "wedge" => Macro::symbol("∧"),
        "lor" | "vee" => Macro::symbol("∨"),

        // arrows
        "to" | "rightarrow" => Macro::symbol("→"),
        "gets" | "leftarrow" => Macro::symbol("←"),
        "leftrightarrow" => Macro::symbol("↔"),
        "Rightarrow" => Macro::symbol("⇒"),
        "Leftarrow" => Macro::symbol("⇐"),
        "Leftrightarrow" => Macro::symbol("⇔"),
        "implies" => Macro::symbol("⟹"),
        "iff" => Macro::symbol("⟺"),
        "mapsto" => Macro::symbol("↦"),
        "uparrow" => Macro::symbol("↑"),
        "downarrow" => Macro::symbol("↓"),
        "longrightarrow" => Macro::symbol("⟶"),
        "longleftarrow" => Macro::symbol("⟵"),
        "hookrightarrow" => Macro::symbol("↪"),
        "rightleftharpoons" => Macro::symbol("⇌"),

        // big operators and miscellany
        "sum" => Macro::symbol("∑"),
        "prod" => Macro::symbol("∏"),
        "coprod" => Macro::symbol("∐"),
        "int" => Macro::symbol("∫"),
        "iint" => Macro::symbol("∬"),
        "iiint" => Macro::symbol("∭"),
        "oint" => Macro::symbol("∮"),
        "partial" => Macro::symbol("∂"),
        "nabla" => Macro::symbol("∇"),
        "infty" => Macro::symbol("∞"),
        "emptyset" | "varnothing" => Macro::symbol("∅"),
        "angle" => Macro::symbol("∠"),
        "triangle" => Macro::symbol("△"),
        "hbar" => Macro::symbol("ℏ"),
        "ell" => Macro::symbol("ℓ"),
        "Re" => Macro::symbol("ℜ"),
        "Im" => Macro::symbol("ℑ"),
        "aleph" => Macro::symbol("ℵ"),
        "prime" => Macro::symbol("′"),
        "dagger" => Macro::symbol("†"),
        "degree" => Macro::symbol("°"),
        "ldots" | "dots" => Macro::symbol("…"),
        "cdots" => Macro::symbol("⋯"),
        "vdots" => Macro::symbol("⋮"),
        "ddots" => Macro::symbol("⋱"),

        // delimiters
        "langle" => Macro::symbol("⟨"),
        "rangle" => Macro::symbol("⟩"),
        "lfloor" => Macro::symbol("⌊"),
        "rfloor" => Macro::symbol("⌋"),
        "lceil" => Macro::symbol("⌈"),
        "rceil" => Macro::symbol("⌉"),
        "vert" => Macro::symbol("|"),
        "Vert" | "|" => Macro::symbol("‖"),
        "left" | "right" | "big" | "Big" | "bigg" | "Bigg" | "bigl" | "bigr" | "Bigl"
        | "Bigr" => Macro::symbol(""),

        // spacing
        "," => Macro::symbol("\u{2009}"),
        ":" | ">" => Macro::symbol("\u{205F}"),
        ";" => Macro::symbol("\u{2004}"),
        "!" => Macro::symbol(""),
        " " | "\\" => Macro::symbol(" "),
        "quad" => Macro::symbol("\u{2003}"),
        "qquad" => Macro::symbol("\u{2003}\u{2003}"),

        // escaped specials
        "{" => Macro::symbol("{"),
        "}" => Macro::symbol("}"),
        "%" => Macro::symbol("%"),
        "$" => Macro::symbol("$"),
        "&" => Macro::symbol("&"),
        "#" => Macro::symbol("#"),
        "_" => Macro::symbol("_"),

        // style switches without arguments
        "displaystyle" | "textstyle" | "scriptstyle" | "limits" | "nolimits" | "rm" | "bf"
        | "it" | "cal" => Macro::symbol(""),

        // style wrappers
        "mathrm" | "mathbf" | "mathit" | "mathsf" | "mathtt" | "mathcal" | "mathfrak"
        | "boldsymbol" | "text" | "textrm" | "textit" | "textbf" | "mbox" | "hbox"
        | "operatorname" | "mathop" => Macro::identity(),
        "mathbb" => Macro::function(Arity::ONE, double_struck),

        // accents
        "vec" => Macro::function(Arity::ONE, |a| accent(a, '\u{20D7}')),
        "hat" | "widehat" => Macro::function(Arity::ONE, |a| accent(a, '\u{0302}')),
        "bar" | "overline" => Macro::function(Arity::ONE, |a| accent(a, '\u{0305}')),
        "dot" => Macro::function(Arity::ONE, |a| accent(a, '\u{0307}')),
        "ddot" => Macro::function(Arity::ONE, |a| accent(a, '\u{0308}')),
        "tilde" | "widetilde" => Macro::function(Arity::ONE, |a| accent(a, '\u{0303}')),

        // structural
        "sqrt" => Macro::function(Arity::OPTIONAL_ONE, sqrt),
        "frac" | "dfrac" | "tfrac" => Macro::function(Arity::TWO, frac),
        "binom" => Macro::function(Arity::TWO, binom),
        "pmod" => Macro::function(Arity::ONE, |a| format!(" (mod {})", text(a, 0))),
        "bmod" | "mod" => Macro::symbol(" mod "),

        _ => return None,
    };
    Some(m)
}

fn text(args: &[Arg], index: usize) -> &str {
    args.get(index).map_or("", |a| a.text.as_str())
}

/// Whether an operand reads unambiguously without parentheses.
fn is_simple(operand: &str) -> bool {
    !operand.is_empty() && operand.chars().all(char::is_alphanumeric)
}

fn sqrt(args: &[Arg]) -> String {
    let (index, radicand) = match args {
        [index, radicand] if index.delim == Delim::Bracket => (Some(index.text.trim()), radicand),
        [radicand, ..] => (None, radicand),
        [] => return "√".to_string(),
    };
    let sign = match index {
        None | Some("") | Some("2") => "√".to_string(),
        Some("3") => "∛".to_string(),
        Some("4") => "∜".to_string(),
        Some(n) => match to_superscript(n) {
            Some(sup) => format!("{}√", sup),
            None => format!("{}√", n),
        },
    };
    format!("{}({})", sign, radicand.text)
}

fn frac(args: &[Arg]) -> String {
    let (num, den) = (text(args, 0), text(args, 1));
    if is_simple(num) && is_simple(den) {
        format!("{}/{}", num, den)
    } else {
        format!("({})/({})", num, den)
    }
}

fn binom(args: &[Arg]) -> String {
    format!("C({},{})", text(args, 0), text(args, 1))
}

fn accent(args: &[Arg], mark: char) -> String {
    let mut out = text(args, 0).to_string();
    if !out.is_empty() {
        out.push(mark);
    }
    out
}

fn double_struck(args: &[Arg]) -> String {
    text(args, 0)
        .chars()
        .map(|c| match c {
            'C' => 'ℂ',
            'H' => 'ℍ',
            'N' => 'ℕ',
            'P' => 'ℙ',
            'Q' => 'ℚ',
            'R' => 'ℝ',
            'Z' => 'ℤ',
            other => other,
        })
        .collect()
}
