//! Source reconstruction
//!
//! `Display` on constructs renders canonical source text. Lexing and
//! parsing the rendered text again yields a tree with the same
//! [`Construct::shape`].

use crate::ast::*;
use std::fmt;

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::ScriptRoot(n) => fmt::Display::fmt(n, f),
            Construct::Statement(n) => fmt::Display::fmt(n, f),
            Construct::Import(n) => fmt::Display::fmt(n, f),
            Construct::Export(n) => fmt::Display::fmt(n, f),
            Construct::Module(n) => fmt::Display::fmt(n, f),
            Construct::Function(n) => fmt::Display::fmt(n, f),
            Construct::Call(n) => fmt::Display::fmt(n, f),
            Construct::PropertyAccessor(n) => fmt::Display::fmt(n, f),
            Construct::List(n) => fmt::Display::fmt(n, f),
            Construct::Dictionary(n) => fmt::Display::fmt(n, f),
            Construct::Expression(n) => fmt::Display::fmt(n, f),
            Construct::Value(n) => fmt::Display::fmt(n, f),
        }
    }
}

impl fmt::Display for ScriptRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join(f, &self.statements, "\n")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("import ")?;
        let specifiers: Vec<&str> = self.specifiers.iter().map(|t| t.source.as_str()).collect();
        f.write_str(&specifiers.join(", "))
    }
}

impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("export ")?;
        join(f, &self.expressions, ", ")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {}", self.name.source)?;
        for statement in &self.statements {
            write!(f, "\n{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name.source)?;
        if let Some(ty) = &self.type_ref {
            write!(f, ": {}", ty.source)?;
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bare = self.name.is_none()
            && self.return_type.is_none()
            && matches!(self.params.as_slice(), [p] if p.type_ref.is_none());
        if bare {
            return f.write_str(&self.params[0].name.source);
        }
        if let Some(name) = &self.name {
            f.write_str(&name.source)?;
        }
        f.write_str("(")?;
        join(f, &self.params, ", ")?;
        f.write_str(")")?;
        if let Some(ty) = &self.return_type {
            write!(f, ": {}", ty.source)?;
        }
        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.signature, self.body)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.callee)?;
        join(f, &self.arguments, ", ")?;
        f.write_str(")")
    }
}

impl fmt::Display for PropertyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.target, self.index)
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        join(f, &self.elements, ", ")?;
        f.write_str("]")
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key.source, value)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for term in self.infix_terms() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match term {
                InfixTerm::Operand(value) => write!(f, "{}", value)?,
                InfixTerm::Operator(token) => f.write_str(&token.source)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, part) in self.parts.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            match part {
                ValuePart::Token(token) => f.write_str(&token.source)?,
                ValuePart::Construct(construct) => match construct.as_ref() {
                    Construct::Expression(group) => write!(f, "({})", group)?,
                    other => write!(f, "{}", other)?,
                },
            }
        }
        Ok(())
    }
}
