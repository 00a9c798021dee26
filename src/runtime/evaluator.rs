use crate::error::{Error, Result};
use crate::parser::{Assign, Command, Declaration, Expr, SetExpr, UnaryOp};
use crate::runtime::console::{Console, StdConsole};
use crate::runtime::{operators, ExecutionConfig, Memory, Value};
use std::collections::BTreeMap;

/// Tree-walking interpreter
///
/// Executes a parsed [`Command`] tree directly against a flat global
/// [`Memory`] and a [`Console`]. Blocks and loops introduce no scopes:
/// every name lives in the one store for the lifetime of the interpreter.
#[derive(Debug)]
pub struct Interpreter<C: Console = StdConsole> {
    memory: Memory,
    console: C,
    config: ExecutionConfig,
}

impl Interpreter<StdConsole> {
    /// Creates an interpreter wired to standard output and standard input
    pub fn stdio() -> Self {
        Interpreter::new(StdConsole)
    }
}

impl<C: Console> Interpreter<C> {
    /// Creates an interpreter with the default configuration
    pub fn new(console: C) -> Self {
        Interpreter::with_config(console, ExecutionConfig::default())
    }

    pub fn with_config(console: C, config: ExecutionConfig) -> Self {
        Interpreter {
            memory: Memory::new(),
            console,
            config,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Consumes the interpreter, handing back its console
    pub fn into_console(self) -> C {
        self.console
    }

    /// Runs a whole program
    pub fn run(&mut self, program: &Command) -> Result<()> {
        tracing::debug!(config = ?self.config, "execution started");
        self.execute(program)?;
        tracing::debug!(variables = self.memory.len(), "execution finished");
        Ok(())
    }

    /// Executes one command
    pub fn execute(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Blocks { commands, .. } => {
                for command in commands {
                    self.execute(command)?;
                }
                Ok(())
            }

            Command::Print {
                line,
                newline,
                expr,
            } => {
                let value = self.evaluate(expr)?;
                let mut text = value.to_string();
                if *newline {
                    text.push('\n');
                }
                self.write(&text, *line)
            }

            Command::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }

            Command::While {
                line,
                condition,
                body,
            } => {
                let mut iterations = 0;
                while self.evaluate(condition)?.is_truthy() {
                    self.tick(&mut iterations, *line)?;
                    self.execute(body)?;
                }
                Ok(())
            }

            Command::For {
                line,
                declarations,
                assignments,
                condition,
                post,
                body,
            } => {
                for declaration in declarations {
                    self.declare(declaration)?;
                }
                for assign in assignments {
                    self.assign(assign)?;
                }

                // No condition means no iterations
                let Some(condition) = condition else {
                    return Ok(());
                };

                let mut iterations = 0;
                while self.evaluate(condition)?.is_truthy() {
                    self.tick(&mut iterations, *line)?;
                    self.execute(body)?;
                    for assign in post {
                        self.assign(assign)?;
                    }
                }
                Ok(())
            }

            Command::Foreach {
                line,
                variable,
                iterable,
                body,
            } => {
                let items = self.iteration_items(iterable, *line)?;

                let mut iterations = 0;
                for item in items {
                    self.tick(&mut iterations, *line)?;
                    self.memory.write(variable, item);
                    self.execute(body)?;
                }
                Ok(())
            }

            Command::Assign(assign) => self.assign(assign),

            Command::Declaration(declaration) => self.declare(declaration),
        }
    }

    /// Evaluates one expression
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Const { value, .. } => Ok(value.clone()),

            Expr::Location(target) => self.load(target),

            Expr::Binary {
                line,
                left,
                op,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                operators::binary(*op, &left, &right, *line)
            }

            Expr::Unary {
                line,
                op: UnaryOp::Read,
                operand,
            } => {
                let prompt = self.evaluate(operand)?;
                self.read(&prompt, *line)
            }

            Expr::Unary { line, op, operand } => {
                let value = self.evaluate(operand)?;
                operators::unary(*op, &value, *line)
            }

            Expr::Cast {
                operand, target, ..
            } => {
                let value = self.evaluate(operand)?;
                Ok(operators::cast(*target, &value))
            }

            Expr::ArrayLiteral { items, .. } => {
                let values = items
                    .iter()
                    .map(|item| self.evaluate(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::array(values))
            }

            Expr::MapLiteral { entries, .. } => {
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    let value = self.evaluate(value)?;
                    map.insert(key.clone(), value);
                }
                Ok(Value::map(map))
            }

            Expr::Switch {
                line,
                subject,
                cases,
                default,
            } => {
                let subject = self.evaluate(subject)?;
                for (label, result) in cases {
                    let label = self.evaluate(label)?;
                    if subject == label {
                        return self.evaluate(result);
                    }
                }
                match default {
                    Some(default) => self.evaluate(default),
                    None => {
                        tracing::trace!(line, "switch fell through without default");
                        Ok(Value::Null)
                    }
                }
            }
        }
    }

    fn assign(&mut self, assign: &Assign) -> Result<()> {
        let (place, value) = match assign.op.binary_op() {
            None => {
                let value = self.evaluate(&assign.value)?;
                (self.resolve(&assign.target)?, value)
            }
            Some(op) => {
                let place = self.resolve(&assign.target)?;
                let current = self.read_place(&place)?;
                let rhs = self.evaluate(&assign.value)?;
                let value = operators::binary(op, &current, &rhs, assign.line)?;
                (place, value)
            }
        };
        self.write_place(place, value)
    }

    fn declare(&mut self, declaration: &Declaration) -> Result<()> {
        match declaration {
            Declaration::Type1 { bindings, .. } => {
                for (name, init) in bindings {
                    let value = match init {
                        Some(expr) => self.evaluate(expr)?,
                        None => Value::Null,
                    };
                    self.memory.write(name, value);
                }
            }
            Declaration::Type2 { names, values, .. } => {
                for (i, name) in names.iter().enumerate() {
                    let value = match values.get(i) {
                        Some(expr) => self.evaluate(expr)?,
                        None => Value::Null,
                    };
                    self.memory.write(name, value);
                }
            }
        }
        Ok(())
    }

    /// Reads the value at a location; unknown variables read as Null
    fn load(&mut self, target: &SetExpr) -> Result<Value> {
        let place = self.resolve(target)?;
        self.read_place(&place)
    }

    /// Walks an access path once, evaluating every index exactly one time
    fn resolve<'a>(&mut self, target: &'a SetExpr) -> Result<Place<'a>> {
        match target {
            SetExpr::Variable { name, .. } => Ok(Place {
                name: name.as_str(),
                path: Vec::new(),
            }),
            SetExpr::Access { line, base, index } => {
                let mut place = self.resolve(base)?;
                let container = self.read_place(&place)?;
                let index = self.evaluate(index)?;
                place.path.push(Step {
                    line: *line,
                    container,
                    index,
                });
                Ok(place)
            }
        }
    }

    fn read_place(&self, place: &Place<'_>) -> Result<Value> {
        match place.path.last() {
            None => Ok(self.memory.get(place.name)),
            Some(Step {
                line,
                container,
                index,
            }) => container.lookup(index).ok_or_else(|| {
                Error::type_error(
                    *line,
                    format!(
                        "cannot index {} with {}",
                        container.type_name(),
                        index.type_name()
                    ),
                )
            }),
        }
    }

    /// Writes a value to a resolved location, rebuilding each container
    /// on the way back up to the root variable
    fn write_place(&mut self, place: Place<'_>, value: Value) -> Result<()> {
        if !place.path.is_empty() && !self.config.indexed_assignment {
            tracing::trace!(name = place.name, "indexed assignment disabled, write ignored");
            return Ok(());
        }
        let mut value = value;
        for step in place.path.into_iter().rev() {
            value = operators::replace(&step.container, &step.index, value, step.line)?;
        }
        self.memory.write(place.name, value);
        Ok(())
    }

    fn iteration_items(&mut self, iterable: &Expr, line: usize) -> Result<Vec<Value>> {
        let value = self.evaluate(iterable)?;
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => Ok(items.as_ref().clone()),
            Value::Map(entries) => Ok(entries.keys().map(|k| Value::text(k.as_str())).collect()),
            Value::Text(text) => Ok(text.chars().map(|c| Value::Text(c.to_string())).collect()),
            other => Err(Error::type_error(
                line,
                format!("cannot iterate over {}", other.type_name()),
            )),
        }
    }

    /// Counts a loop iteration against the configured limit
    fn tick(&self, iterations: &mut usize, line: usize) -> Result<()> {
        *iterations += 1;
        match self.config.max_iterations {
            Some(limit) if *iterations > limit => Err(Error::IterationLimit { line, limit }),
            _ => Ok(()),
        }
    }

    fn read(&mut self, prompt: &Value, line: usize) -> Result<Value> {
        self.write(&prompt.to_string(), line)?;
        match self.console.read_line() {
            Ok(Some(input)) => Ok(Value::Text(input)),
            Ok(None) => Err(Error::InputError {
                line,
                message: "end of input".to_string(),
            }),
            Err(err) => Err(Error::InputError {
                line,
                message: err.to_string(),
            }),
        }
    }

    fn write(&mut self, text: &str, line: usize) -> Result<()> {
        self.console
            .write(text)
            .map_err(|err| Error::Io {
                line,
                message: err.to_string(),
            })
    }
}

/// An assignment target with its indices already evaluated
struct Place<'a> {
    name: &'a str,
    path: Vec<Step>,
}

/// One container on an access path and the index taken into it
struct Step {
    line: usize,
    container: Value,
    index: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::runtime::BufferConsole;

    fn run_with(source: &str, config: ExecutionConfig) -> Result<Interpreter<BufferConsole>> {
        let program = Parser::from_source(source).parse()?;
        let mut interpreter = Interpreter::with_config(BufferConsole::new(), config);
        interpreter.run(&program)?;
        Ok(interpreter)
    }

    fn run(source: &str) -> Interpreter<BufferConsole> {
        run_with(source, ExecutionConfig::default()).unwrap()
    }

    fn output(source: &str) -> String {
        run(source).into_console().take_output()
    }

    #[test]
    fn test_print_forms() {
        assert_eq!(output("print(1) print(null) println(\"!\")"), "1null!\n");
        assert_eq!(output("println([1, [a: true]])"), "[1, [a: true]]\n");
    }

    #[test]
    fn test_declarations() {
        let interp = run("def a, b = 5\ndef (x, y, z) = [1, 2]");
        let memory = interp.memory();
        assert_eq!(memory.get("a"), Value::Null);
        assert_eq!(memory.get("b"), Value::Number(5));
        assert_eq!(memory.get("x"), Value::Number(1));
        assert_eq!(memory.get("y"), Value::Number(2));
        assert_eq!(memory.get("z"), Value::Null);
    }

    #[test]
    fn test_declaration_ignores_extra_initializers() {
        // The third initializer would fail if it were evaluated
        let interp = run("def (a, b) = [1, 2, 1 / 0]");
        assert_eq!(interp.memory().get("b"), Value::Number(2));
    }

    #[test]
    fn test_for_without_condition() {
        let interp = run("def n = 0\nfor (def i = 0; ; i += 1) n += 1");
        assert_eq!(interp.memory().get("i"), Value::Number(0));
        assert_eq!(interp.memory().get("n"), Value::Number(0));
    }

    #[test]
    fn test_for_loop() {
        assert_eq!(
            output("for (def i = 0; i < 3; i += 1) print(i)"),
            "012"
        );
    }

    #[test]
    fn test_while_and_if() {
        let source = r#"
def n = 5, acc = ""
while (n > 0) {
    if (n % 2 == 0) acc += "e" else acc += "o"
    n -= 1
}
println(acc)
"#;
        assert_eq!(output(source), "oeoeo\n");
    }

    #[test]
    fn test_indexed_write_through() {
        let interp = run("def m = [a: [1, 2]]\nm.a[1] = 9\nm.b = 3\nm.a[3] = 0 + 1");
        assert_eq!(
            interp.memory().get("m").to_string(),
            "[a: [1, 9, null, 1], b: 3]"
        );
    }

    #[test]
    fn test_indexed_compound_on_missing_text() {
        // The missing element reads as Null, which `+=` rejects
        let err = run_with("def a = []\na[0] += 1", ExecutionConfig::default()).unwrap_err();
        assert!(matches!(err, Error::TypeError { line: 2, .. }));
    }

    #[test]
    fn test_compound_index_evaluated_once() {
        let program = Parser::from_source("def m = [x: 1, y: 10]\nm[read(\"k? \")] += 5")
            .parse()
            .unwrap();
        let mut interp = Interpreter::new(BufferConsole::with_input(["x", "y"]));
        interp.run(&program).unwrap();
        assert_eq!(interp.console_mut().take_output(), "k? ");
        assert_eq!(interp.memory().get("m").to_string(), "[x: 6, y: 10]");
    }

    #[test]
    fn test_indexed_write_disabled() {
        let config = ExecutionConfig::default().with_indexed_assignment(false);
        let interp = run_with("def a = [1]\na[0] = 2", config).unwrap();
        assert_eq!(interp.memory().get("a"), Value::array(vec![Value::Number(1)]));
    }

    #[test]
    fn test_foreach() {
        assert_eq!(output("foreach (x in [1, 2, 3]) print(x)"), "123");
        assert_eq!(output("foreach (def k in [b: 1, a: 2]) print(k)"), "ab");
        assert_eq!(output("foreach (c in \"hey\") print(c + \".\")"), "h.e.y.");
        assert_eq!(output("foreach (c in null) print(c)"), "");

        let err = run_with("foreach (x in 3) print(x)", ExecutionConfig::default()).unwrap_err();
        assert!(matches!(err, Error::TypeError { line: 1, .. }));
    }

    #[test]
    fn test_switch() {
        let source = r#"
def n = 2
println(switch (n) { case 1 -> "one" case 2 -> "two" default -> "many" })
println(switch (n) { case 1 -> "one" })
println(switch (n) { case 2 -> "hit" case 1 / 0 -> "never" })
"#;
        assert_eq!(output(source), "two\nnull\nhit\n");
    }

    #[test]
    fn test_read() {
        let program = Parser::from_source("def name = read(\"who? \")\nprintln(\"hi \" + name)")
            .parse()
            .unwrap();
        let mut interp = Interpreter::new(BufferConsole::with_input(["ana"]));
        interp.run(&program).unwrap();
        assert_eq!(interp.console().output(), "who? hi ana\n");

        let mut interp = Interpreter::new(BufferConsole::new());
        let err = interp.run(&program).unwrap_err();
        assert!(matches!(err, Error::InputError { line: 1, .. }));
    }

    #[test]
    fn test_iteration_limit() {
        let config = ExecutionConfig::default().with_max_iterations(10);
        let err = run_with("def i = 0\nwhile (1) i += 1", config).unwrap_err();
        assert_eq!(err, Error::IterationLimit { line: 2, limit: 10 });
        assert_eq!(err.to_string(), "02: Too many iterations (limit: 10)");

        let config = ExecutionConfig::default().with_max_iterations(3);
        assert!(run_with("for (def i = 0; i < 3; i += 1) {}", config).is_ok());
    }

    #[test]
    fn test_runtime_errors_carry_lines() {
        let err = run_with("def x = 1\n\ndef y = x / 0", ExecutionConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "03: Division by zero");

        let err = run_with("def x = 1\nx[0] = 2", ExecutionConfig::default()).unwrap_err();
        assert!(matches!(err, Error::TypeError { line: 2, .. }));

        let err = run_with("println(-true)", ExecutionConfig::default()).unwrap_err();
        assert!(matches!(err, Error::TypeError { line: 1, .. }));
    }
}
