use crate::{
    errors::{CodecError, TypeError},
    io::options::ReaderOptions,
    syntax::string_literal::{unescape_path, unescape_string},
    types::{Type, store::TypeStore},
    values::{Value, ValueFactory, Writer},
};
use pest::{
    Parser,
    iterators::{Pair, Pairs},
};
use pest_derive::Parser;
use std::{io::Read, iter::Peekable};
use tracing::{debug, trace};

#[derive(Parser)]
#[grammar = "io/standard_text.pest"]
struct StandardTextParser;

/// Reads values from their canonical text form.
///
/// Collections are assembled through writers with inferred element types, so
/// the value read back has the same type as one built by the factory from the
/// same elements. Constructor applications are resolved against the store
/// given to [`with_store`](Self::with_store); without one they fail with
/// [`TypeError::UndeclaredAdt`].
///
/// Nesting is tracked on an explicit stack, so the reader's own stack use does
/// not grow with the depth of the input.
pub struct StandardTextReader<'s, 'a> {
    store: Option<&'s TypeStore<'a>>,
    options: ReaderOptions,
}

impl<'s, 'a> StandardTextReader<'s, 'a> {
    pub fn new() -> Self {
        Self {
            store: None,
            options: ReaderOptions::default(),
        }
    }

    pub fn with_store(store: &'s TypeStore<'a>) -> Self {
        Self {
            store: Some(store),
            options: ReaderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn read(&self, vf: &ValueFactory<'a>, mut source: impl Read) -> Result<Value<'a>, CodecError> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;
        self.read_str(vf, &text)
    }

    pub fn read_str(&self, vf: &ValueFactory<'a>, text: &str) -> Result<Value<'a>, CodecError> {
        trace!(len = text.len(), "reading value");

        let mut pairs = StandardTextParser::parse(Rule::document, text).map_err(|err| {
            debug!(error = %err, "text does not tokenize");
            CodecError::Syntax(err.to_string())
        })?;
        let document = pairs
            .next()
            .ok_or_else(|| CodecError::Syntax("missing document".to_string()))?;
        let mut tokens = Tokens {
            pairs: document.into_inner().peekable(),
        };

        let value = self.parse(vf, &mut tokens)?;
        match tokens.next() {
            None => Ok(value),
            Some(token) => Err(unexpected(Some(&token), "end of input")),
        }
    }

    fn parse(&self, vf: &ValueFactory<'a>, tokens: &mut Tokens<'_>) -> Result<Value<'a>, CodecError> {
        let mut stack: Vec<Frame<'s, 'a>> = Vec::new();

        'value: loop {
            let token = tokens.next();
            let mut value = match self.start(vf, token, tokens)? {
                Start::Value(value) => value,
                Start::Open(open) => {
                    if stack.len() >= self.options.max_depth {
                        debug!(max_depth = self.options.max_depth, "input nests too deeply");
                        return Err(CodecError::TooDeep {
                            max_depth: self.options.max_depth,
                        });
                    }
                    if tokens.next_if_punct(open.closer()) {
                        close(vf, open, Vec::new())?
                    } else {
                        stack.push(Frame {
                            open,
                            children: Vec::new(),
                        });
                        continue 'value;
                    }
                }
            };

            // Hand the finished value to its parent, closing every frame it completes.
            loop {
                let Some(mut frame) = stack.pop() else {
                    return Ok(value);
                };
                frame.children.push(value);
                let awaiting = frame.awaiting_value();
                let closer = frame.open.closer();

                let token = tokens.next();
                match token.as_ref().and_then(punct) {
                    Some(":") if awaiting => {}
                    Some(",") if !awaiting => {}
                    Some(p) if p == closer && !awaiting => {
                        value = close(vf, frame.open, frame.children)?;
                        continue;
                    }
                    _ if awaiting => return Err(unexpected(token.as_ref(), "`:`")),
                    _ => return Err(unexpected(token.as_ref(), &format!("`,` or `{closer}`"))),
                }
                stack.push(frame);
                continue 'value;
            }
        }
    }

    /// Reads the tokens that begin a value: either a whole scalar or the
    /// opening of a collection, node or constructor application.
    fn start(
        &self,
        vf: &ValueFactory<'a>,
        token: Option<Pair<'_, Rule>>,
        tokens: &mut Tokens<'_>,
    ) -> Result<Start<'s, 'a>, CodecError> {
        let Some(token) = token else {
            return Err(unexpected(None, "a value"));
        };
        let value: Value<'a> = match token.as_rule() {
            Rule::integer => vf.integer(parse_number(token.as_str(), "integer")?).into(),
            Rule::double => vf.double(parse_number(token.as_str(), "double")?).into(),
            Rule::location => read_location(vf, token)?,
            Rule::string => {
                let text = read_string(token)?;
                if tokens.next_if_punct("(") {
                    return Ok(Start::Open(Open::Node(text)));
                }
                vf.string(&text).into()
            }
            Rule::ident => return self.start_ident(vf, token, tokens),
            Rule::punct => {
                let open = match token.as_str() {
                    "<" => Open::Tuple,
                    "[" => Open::List,
                    "{" => Open::Set,
                    "(" => Open::Map,
                    _ => return Err(unexpected(Some(&token), "a value")),
                };
                return Ok(Start::Open(open));
            }
            _ => return Err(unexpected(Some(&token), "a value")),
        };
        Ok(Start::Value(value))
    }

    fn start_ident(
        &self,
        vf: &ValueFactory<'a>,
        token: Pair<'_, Rule>,
        tokens: &mut Tokens<'_>,
    ) -> Result<Start<'s, 'a>, CodecError> {
        let name = token.as_str();
        if tokens.next_if_punct("(") {
            return Ok(Start::Open(Open::Node(name.to_string())));
        }
        if tokens.next_if_punct("::") {
            let cons = tokens.next();
            let cons_name = match cons.as_ref() {
                Some(pair) if pair.as_rule() == Rule::ident => pair.as_str(),
                other => return Err(unexpected(other, "a constructor name")),
            };
            if !tokens.next_if_punct("(") {
                return Err(unexpected(tokens.next().as_ref(), "`(`"));
            }

            let undeclared = || TypeError::UndeclaredAdt {
                name: name.to_string(),
            };
            let store = self.store.ok_or_else(undeclared)?;
            let adt = store.lookup_adt(name).ok_or_else(undeclared)?;
            return Ok(Start::Open(Open::Constructor {
                store,
                adt,
                name: cons_name.to_string(),
            }));
        }

        let value: Value<'a> = match name {
            "true" => vf.bool(true).into(),
            "false" => vf.bool(false).into(),
            "nan" => vf.double(f64::NAN).into(),
            "inf" => vf.double(f64::INFINITY).into(),
            _ => return Err(unexpected(Some(&token), "a value")),
        };
        Ok(Start::Value(value))
    }
}

impl Default for StandardTextReader<'_, '_> {
    fn default() -> Self {
        Self::new()
    }
}

/// The token stream of a document, without its end-of-input marker.
struct Tokens<'i> {
    pairs: Peekable<Pairs<'i, Rule>>,
}

impl<'i> Tokens<'i> {
    fn next(&mut self) -> Option<Pair<'i, Rule>> {
        self.pairs.next_if(|pair| pair.as_rule() != Rule::EOI)
    }

    fn next_if_punct(&mut self, expected: &str) -> bool {
        self.pairs
            .next_if(|pair| punct(pair) == Some(expected))
            .is_some()
    }
}

/// A bracket that has been opened and not yet closed.
enum Open<'s, 'a> {
    Tuple,
    List,
    Set,
    Map,
    Node(String),
    Constructor {
        store: &'s TypeStore<'a>,
        adt: &'a Type<'a>,
        name: String,
    },
}

impl Open<'_, '_> {
    fn closer(&self) -> &'static str {
        match self {
            Open::Tuple => ">",
            Open::List => "]",
            Open::Set => "}",
            Open::Map | Open::Node(_) | Open::Constructor { .. } => ")",
        }
    }
}

struct Frame<'s, 'a> {
    open: Open<'s, 'a>,
    children: Vec<Value<'a>>,
}

impl Frame<'_, '_> {
    /// Map children alternate key and value; an odd count means a key is
    /// waiting for its value.
    fn awaiting_value(&self) -> bool {
        matches!(self.open, Open::Map) && self.children.len() % 2 == 1
    }
}

enum Start<'s, 'a> {
    Value(Value<'a>),
    Open(Open<'s, 'a>),
}

fn close<'a>(vf: &ValueFactory<'a>, open: Open<'_, 'a>, children: Vec<Value<'a>>) -> Result<Value<'a>, CodecError> {
    let value = match open {
        Open::Tuple => {
            let mut writer = vf.tuple_writer();
            writer.insert_all(children)?;
            writer.done()?.into()
        }
        Open::List => {
            let mut writer = vf.list_writer();
            writer.insert_all(children)?;
            writer.done()?.into()
        }
        // A set whose elements are all tuples reads back as a relation.
        Open::Set => vf.set(children).into(),
        Open::Map => {
            let mut writer = vf.map_writer();
            let mut sides = children.into_iter();
            while let (Some(key), Some(val)) = (sides.next(), sides.next()) {
                writer.put(key, val)?;
            }
            writer.done()?.into()
        }
        Open::Node(name) => vf.node(&name, children).into(),
        Open::Constructor { store, adt, name } => {
            trace!(adt = %adt, name = %name, arity = children.len(), "resolving constructor");
            vf.construct(store, adt, &name, children)?.into()
        }
    };
    Ok(value)
}

fn punct<'i>(pair: &Pair<'i, Rule>) -> Option<&'i str> {
    (pair.as_rule() == Rule::punct).then(|| pair.as_str())
}

fn unexpected(token: Option<&Pair<'_, Rule>>, expected: &str) -> CodecError {
    let message = match token {
        Some(token) => {
            let (line, col) = token.line_col();
            format!("{line}:{col}: unexpected `{}`, expected {expected}", token.as_str())
        }
        None => format!("unexpected end of input, expected {expected}"),
    };
    debug!(%message, "text does not parse");
    CodecError::Syntax(message)
}

fn parse_number<T>(text: &str, what: &'static str) -> Result<T, CodecError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    text.parse::<T>().map_err(|err| CodecError::Malformed {
        what,
        text: text.to_string(),
        reason: err.to_string(),
    })
}

fn inner_text<'i>(pair: Pair<'i, Rule>, what: &str) -> Result<&'i str, CodecError> {
    pair.into_inner()
        .next()
        .map(|inner| inner.as_str())
        .ok_or_else(|| CodecError::Syntax(format!("missing {what}")))
}

fn read_string(pair: Pair<'_, Rule>) -> Result<String, CodecError> {
    let raw = inner_text(pair, "string body")?;
    unescape_string(raw)
        .map(|s| s.into_owned())
        .map_err(|err| CodecError::Malformed {
            what: "string",
            text: raw.to_string(),
            reason: err.to_string(),
        })
}

fn read_location<'a>(vf: &ValueFactory<'a>, pair: Pair<'_, Rule>) -> Result<Value<'a>, CodecError> {
    let mut inner = pair.into_inner();
    let path_pair = inner
        .next()
        .ok_or_else(|| CodecError::Syntax("missing location path".to_string()))?;
    let raw_path = inner_text(path_pair, "location path")?;
    let path = unescape_path(raw_path).map_err(|err| CodecError::Malformed {
        what: "location path",
        text: raw_path.to_string(),
        reason: err.to_string(),
    })?;

    let mut numbers = [0usize; 6];
    for slot in numbers.iter_mut() {
        let number = inner
            .next()
            .ok_or_else(|| CodecError::Syntax("missing location range".to_string()))?;
        *slot = parse_number::<usize>(number.as_str(), "location range")?;
    }
    let [offset, length, start_line, start_column, end_line, end_column] = numbers;
    let range = vf.source_range(offset, length, start_line, end_line, start_column, end_column);
    Ok(vf.source_location(&path, range).into())
}
