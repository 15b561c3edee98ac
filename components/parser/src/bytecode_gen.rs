//! Bytecode generation from constructs
//!
//! A depth-first walk over the construct tree. Each visit returns a nested
//! [`Emission`]; the tree is flattened once at the end of [`BytecodeGenerator::generate`].

use crate::ast::*;
use crate::context::{Context, ContextBuilder};
use crate::error::{range_error, reference_error, type_error};
use crate::lexer::{classify, string_value, TokenKind};
use crate::parser::parse;
use crate::precedence::{to_postfix, PostfixTerm};
use crate::resolver::{EmptyModuleResolver, ModuleResolver};
use bytecode_system::{BytecodeChunk, Emission, Instruction, Primitive, ValueKind, ValuePointer};
use core_types::{CompileResult, SourceMap};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Register holding the stack pointer
const STACK_REGISTER: &str = "addr";

/// Push the return slot: load the stack pointer and bump it
fn push_stack() -> Emission {
    Emission::sequence([
        Instruction::load(0, STACK_REGISTER),
        Instruction::sum(STACK_REGISTER, 1),
    ])
}

/// Name under which an import's functions are bound.
///
/// The last `/` segment of the specifier, so `lib/io` binds `io.name`.
/// `None` when that segment cannot be spelled as an identifier.
fn import_namespace(specifier: &str) -> Option<&str> {
    let segment = specifier.rsplit('/').next()?;
    (classify(segment) == Some(TokenKind::Identifier)).then_some(segment)
}

/// Lower a literal or symbol reference to its primitive
pub fn materialize(value: &Value, context: &Context<'_>) -> CompileResult<Primitive> {
    if let [ValuePart::Token(token)] = value.parts.as_slice() {
        return match token.kind {
            TokenKind::Integer => {
                let out_of_range = || {
                    range_error(
                        format!("Integer literal `{}` does not fit in one byte", token.source),
                        token,
                    )
                };
                let number: i64 = token.source.parse().map_err(|_| out_of_range())?;
                let byte = match number {
                    0..=255 => number as u8,
                    -128..=-1 => number as i8 as u8,
                    _ => return Err(out_of_range()),
                };
                Ok(Primitive::raw_byte(byte))
            }
            TokenKind::String => Ok(Primitive::string(&string_value(&token.source))),
            TokenKind::Boolean => Ok(Primitive::raw_byte(u8::from(token.source == "true"))),
            TokenKind::Identifier => {
                let pointer = context.resolve_symbol(token)?;
                Ok(Primitive::pointer(pointer.address))
            }
            _ => Err(type_error(
                format!("Token `{}` is not a value", token.source),
                Some(token),
            )),
        };
    }

    match value.path_name() {
        Some(name) => {
            let pointer = context.resolve_name(&name, value.first_token())?;
            Ok(Primitive::pointer(pointer.address))
        }
        None => Err(type_error(
            "Value of this shape cannot be materialized",
            value.first_token(),
        )),
    }
}

/// Bytecode generator that converts constructs to instructions
pub struct BytecodeGenerator {
    next_label: usize,
    resolver: Rc<dyn ModuleResolver>,
    modules: HashMap<String, Rc<ScriptRoot>>,
    sources: SourceMap,
    loading: Vec<String>,
}

impl BytecodeGenerator {
    /// Create a generator whose imports resolve to empty scripts
    pub fn new() -> Self {
        Self::with_resolver(Rc::new(EmptyModuleResolver))
    }

    /// Create a generator resolving imports through `resolver`
    pub fn with_resolver(resolver: Rc<dyn ModuleResolver>) -> Self {
        Self {
            next_label: 0,
            resolver,
            modules: HashMap::new(),
            sources: SourceMap::new(),
            loading: Vec::new(),
        }
    }

    /// Generate the flat instruction list for a script
    pub fn generate(&mut self, script: &ScriptRoot) -> CompileResult<BytecodeChunk> {
        let root = Context::root();
        let emission = self.visit_script(script, &root)?;
        let chunk = BytecodeChunk::from_emission(emission);
        debug!(
            statements = script.statements.len(),
            instructions = chunk.instruction_count(),
            "generated script"
        );
        Ok(chunk)
    }

    fn fresh_label(&mut self) -> String {
        let label = format!("fn-{}", self.next_label);
        self.next_label += 1;
        label
    }

    fn load_module(&mut self, specifier: &str) -> CompileResult<Rc<ScriptRoot>> {
        if let Some(module) = self.modules.get(specifier) {
            return Ok(Rc::clone(module));
        }
        let module = match self.resolver.source(specifier) {
            Some(source) => {
                self.sources.insert(specifier, source.as_str());
                parse(&source, specifier)?
            }
            None => {
                warn!(specifier, "module not found; import resolves to an empty script");
                ScriptRoot {
                    statements: Vec::new(),
                }
            }
        };
        let module = Rc::new(module);
        self.modules.insert(specifier.to_string(), Rc::clone(&module));
        Ok(module)
    }

    /// Source text of every module loaded so far, keyed by specifier
    pub fn into_sources(self) -> SourceMap {
        self.sources
    }

    fn visit_construct(&mut self, construct: &Construct, context: &Context<'_>) -> CompileResult<Emission> {
        match construct {
            Construct::ScriptRoot(script) => self.visit_script(script, context),
            Construct::Statement(statement) => self.visit_statement(statement, context),
            Construct::Import(import) => self.visit_import(import),
            Construct::Function(function) => self.visit_function(function, context),
            Construct::Call(call) => self.visit_call(call, context),
            Construct::Expression(expression) => self.visit_expression(expression, context),
            Construct::Value(value) => self.visit_value(value, context),
            Construct::Export(_)
            | Construct::Module(_)
            | Construct::List(_)
            | Construct::Dictionary(_)
            | Construct::PropertyAccessor(_) => {
                trace!(construct = %construct.kind(), "no emission");
                Ok(Emission::empty())
            }
        }
    }

    fn visit_script(&mut self, script: &ScriptRoot, parent: &Context<'_>) -> CompileResult<Emission> {
        let mut builder = ContextBuilder::new();
        for name in script.named_functions() {
            builder = builder.symbol(name.source.clone(), ValuePointer::new(0, ValueKind::Function));
        }
        for statement in &script.statements {
            if let Construct::Import(import) = statement.inner.as_ref() {
                for token in &import.specifiers {
                    let specifier = string_value(&token.source);
                    let module = self.load_module(&specifier)?;
                    let Some(namespace) = import_namespace(&specifier) else {
                        warn!(specifier = %specifier, "import cannot be named in source; its functions stay unbound");
                        continue;
                    };
                    for name in module.named_functions() {
                        builder = builder.symbol(
                            format!("{}.{}", namespace, name.source),
                            ValuePointer::new(0, ValueKind::Function),
                        );
                    }
                }
            }
        }

        let scope = builder.build_child(parent);
        let mut out = Vec::with_capacity(script.statements.len());
        for statement in &script.statements {
            out.push(self.visit_statement(statement, &scope)?);
        }
        Ok(Emission::Block(out))
    }

    fn visit_statement(&mut self, statement: &Statement, context: &Context<'_>) -> CompileResult<Emission> {
        self.visit_construct(&statement.inner, context)
    }

    fn visit_import(&mut self, import: &Import) -> CompileResult<Emission> {
        let mut out = Vec::with_capacity(import.specifiers.len());
        for token in &import.specifiers {
            let specifier = string_value(&token.source);
            if self.loading.contains(&specifier) {
                return Err(reference_error(
                    format!("Cyclic import of `{}`.", specifier),
                    Some(token),
                ));
            }
            let module = self.load_module(&specifier)?;
            debug!(specifier = %specifier, statements = module.statements.len(), "inlining import");

            self.loading.push(specifier);
            let root = Context::root();
            let inlined = self.visit_script(&module, &root);
            self.loading.pop();
            out.push(inlined?);
        }
        Ok(Emission::Block(out))
    }

    fn visit_function(&mut self, function: &Function, context: &Context<'_>) -> CompileResult<Emission> {
        let label = self.fresh_label();

        let mut builder = ContextBuilder::new();
        for param in &function.signature.params {
            let kind = match &param.type_ref {
                Some(type_ref) => context.resolve_type(type_ref)?,
                None => ValueKind::Raw,
            };
            builder = builder.symbol(param.name.source.clone(), ValuePointer::new(0, kind));
        }
        if let Some(return_type) = &function.signature.return_type {
            context.resolve_type(return_type)?;
        }

        let scope = builder.build_child(context);
        trace!(
            label = %label,
            name = function.signature.name.as_ref().map(|t| t.source.as_str()).unwrap_or("<anonymous>"),
            depth = scope.depth(),
            "function"
        );
        let body = self.visit_expression(&function.body, &scope)?;
        Ok(Emission::Block(vec![Instruction::label(label).into(), body]))
    }

    fn visit_call(&mut self, call: &Call, context: &Context<'_>) -> CompileResult<Emission> {
        let mut out = Vec::with_capacity(call.arguments.len() + 2);
        for argument in &call.arguments {
            out.push(self.visit_expression(argument, context)?);
        }

        let name = call.callee.path_name().ok_or_else(|| {
            type_error("Only named functions can be called", call.callee.first_token())
        })?;
        let pointer = context.resolve_name(&name, call.callee.first_token())?;

        out.push(push_stack());
        out.push(Instruction::jump(pointer.address).into());
        Ok(Emission::Block(out))
    }

    fn visit_expression(&mut self, expression: &Expression, context: &Context<'_>) -> CompileResult<Emission> {
        let mut out = Vec::new();
        for term in to_postfix(expression)? {
            match term {
                PostfixTerm::Operand(value) => out.push(self.visit_value(value, context)?),
                // Arithmetic lowering is not emitted yet
                PostfixTerm::Operator(op, token) => {
                    trace!(operator = %op, offset = token.offset, "operator");
                }
            }
        }
        Ok(Emission::Block(out))
    }

    fn visit_value(&mut self, value: &Value, context: &Context<'_>) -> CompileResult<Emission> {
        match value.as_construct() {
            Some(construct) => self.visit_construct(construct, context),
            None => {
                let primitive = materialize(value, context)?;
                trace!(kind = %primitive.kind, bytes = ?primitive.bytes, "materialized value");
                Ok(Emission::empty())
            }
        }
    }
}

impl Default for BytecodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
