// AST definitions for the pseudocode dialect

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Scalar types a variable or array element may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Integer,
    Real,
    Boolean,
    Char,
    String,
}

impl BaseType {
    /// Resolve a type keyword (`INTEGER`, `REAL`, ...) to its tag
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "INTEGER" => Some(BaseType::Integer),
            "REAL" => Some(BaseType::Real),
            "BOOLEAN" => Some(BaseType::Boolean),
            "CHAR" => Some(BaseType::Char),
            "STRING" => Some(BaseType::String),
            _ => None,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BaseType::Integer => "INTEGER",
            BaseType::Real => "REAL",
            BaseType::Boolean => "BOOLEAN",
            BaseType::Char => "CHAR",
            BaseType::String => "STRING",
        };
        f.write_str(name)
    }
}

/// Type tag carried by every variable alongside its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Base(BaseType),
    Array {
        lower: i64,
        upper: i64,
        element: BaseType,
    },
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Base(base) => write!(f, "{}", base),
            Type::Array {
                lower,
                upper,
                element,
            } => write!(f, "ARRAY[{}:{}] OF {}", lower, upper, element),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    // Relational
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "MOD",
            BinOp::Pow => "^",
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "AND",
            BinOp::Or => "OR",
        };
        f.write_str(symbol)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // NOT x
}

/// Expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(i64, SourceLocation),
    RealLiteral(f64, SourceLocation),
    BoolLiteral(bool, SourceLocation),
    CharLiteral(char, SourceLocation),
    StringLiteral(String, SourceLocation),

    Variable(String, SourceLocation),

    /// `name[index]`
    Index {
        array: String,
        index: Box<Expr>,
        location: SourceLocation,
    },

    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },

    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(_, loc)
            | Expr::RealLiteral(_, loc)
            | Expr::BoolLiteral(_, loc)
            | Expr::CharLiteral(_, loc)
            | Expr::StringLiteral(_, loc)
            | Expr::Variable(_, loc) => *loc,
            Expr::Index { location, .. }
            | Expr::BinaryOp { location, .. }
            | Expr::UnaryOp { location, .. } => *location,
        }
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Variable(String),
    Element { array: String, index: Expr },
}

/// Block-opening statement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    For,
    While,
    Procedure,
}

impl BlockKind {
    pub fn keyword(self) -> &'static str {
        match self {
            BlockKind::If => "IF",
            BlockKind::For => "FOR",
            BlockKind::While => "WHILE",
            BlockKind::Procedure => "PROCEDURE",
        }
    }

    pub fn closing_keyword(self) -> &'static str {
        match self {
            BlockKind::If => "ENDIF",
            BlockKind::For => "NEXT",
            BlockKind::While => "ENDWHILE",
            BlockKind::Procedure => "ENDPROCEDURE",
        }
    }
}

/// One statement of the dialect. Every source line holds exactly one.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `DECLARE name:TYPE`
    Declare { name: String, base: BaseType },

    /// `ARRAY name[lower:upper] OF TYPE`
    ArrayDecl {
        name: String,
        lower: Expr,
        upper: Expr,
        element: BaseType,
    },

    /// `target ← value`
    Assign { target: Target, value: Expr },

    /// `OUTPUT e1, e2, ...`
    Output { items: Vec<Expr> },

    /// `INPUT name`
    Input { name: String },

    If { condition: Expr },
    Else,
    EndIf,

    /// `FOR var ← start TO end`
    For { var: String, start: Expr, end: Expr },
    /// `NEXT var`; the variable is checked by the block segmenter
    Next { var: Option<String> },
    EndFor,

    While { condition: Expr },
    EndWhile,

    Procedure { name: String, params: Vec<String> },
    EndProcedure,

    /// `name(args)` or `CALL name(args)`
    Call { name: String, args: Vec<Expr> },

    /// A line that failed to lex or parse; raised when execution reaches it
    Invalid(crate::parser::parse::ParseError),
}

impl Stmt {
    /// The block this statement opens, if any
    pub fn opens(&self) -> Option<BlockKind> {
        match self {
            Stmt::If { .. } => Some(BlockKind::If),
            Stmt::For { .. } => Some(BlockKind::For),
            Stmt::While { .. } => Some(BlockKind::While),
            Stmt::Procedure { .. } => Some(BlockKind::Procedure),
            _ => None,
        }
    }

    /// The block this statement closes, if any
    pub fn closes(&self) -> Option<BlockKind> {
        match self {
            Stmt::EndIf => Some(BlockKind::If),
            Stmt::Next { .. } | Stmt::EndFor => Some(BlockKind::For),
            Stmt::EndWhile => Some(BlockKind::While),
            Stmt::EndProcedure => Some(BlockKind::Procedure),
            _ => None,
        }
    }
}

/// A parsed source line
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 1-based line number in the program source
    pub number: usize,
    /// Trimmed source text, used for step records
    pub text: String,
    pub stmt: Stmt,
}

/// A whole program: one entry per non-blank, non-comment line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub lines: Vec<Line>,
}

impl Program {
    pub fn new() -> Self {
        Program { lines: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
