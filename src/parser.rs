use crate::ast::{
    ArrayAccess, Assignment, BinaryExpression, Expression, For, FunctionCall, FunctionDeclaration,
    Identifier, If, Literal, Operator, Parameter, Program, Return, Statement, TypeDescriptor,
    UnaryExpression, UnaryOperator, VariableDeclaration,
};
use crate::token::{Token, TokenKind};
use custom_error::custom_error;
use log::trace;
use std::rc::Rc;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub ParseError

    UnexpectedToken{message: String, token: Token} = "{message}, found {token}",
    InvalidType{token: Token} = "expected a valid type, found {token}",
    MissingReturn{function: String, return_type: TypeDescriptor, token: Token} = "function '{function}' with return type '{return_type}' must have a return statement",
}

impl ParseError {
    /// The token the parser was looking at when it gave up.
    pub fn token(&self) -> &Token {
        match self {
            Self::UnexpectedToken { token, .. } => token,
            Self::InvalidType { token } => token,
            Self::MissingReturn { token, .. } => token,
        }
    }
}

type Result<T> = std::result::Result<T, ParseError>;

pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse_program()
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    eof: Token,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let line = tokens.last().map_or(1, |token| token.line);
        Self {
            tokens,
            position: 0,
            eof: Token::eof(line),
        }
    }

    fn cur_token(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    fn peek_token(&self) -> &Token {
        self.tokens.get(self.position + 1).unwrap_or(&self.eof)
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur_token().is(kind)
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token().is(kind)
    }

    fn next_token(&mut self) -> Token {
        let token = self.cur_token().clone();
        if !token.is(TokenKind::Eof) {
            self.position += 1;
        }
        token
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.cur_is(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token> {
        if self.cur_is(kind) {
            Ok(self.next_token())
        } else {
            Err(self.error(message))
        }
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::UnexpectedToken {
            message: message.to_owned(),
            token: self.cur_token().clone(),
        }
    }

    pub fn parse_program(mut self) -> Result<Program> {
        let mut program = Program::default();

        while !self.cur_is(TokenKind::Eof) {
            program.statements.push(self.parse_statement()?);
        }

        trace!("parsed {} top-level statements", program.statements.len());
        Ok(program)
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        let kind = self.cur_token().kind;
        match kind {
            TokenKind::Var => self
                .parse_variable_declaration()
                .map(Statement::VariableDeclaration),
            TokenKind::Func => self
                .parse_function_declaration()
                .map(|function| Statement::FunctionDeclaration(Rc::new(function))),
            TokenKind::If => self.parse_if_statement().map(Statement::If),
            TokenKind::For => self.parse_for_statement().map(Statement::For),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            TokenKind::Identifier if self.peek_is(TokenKind::Assign) => {
                let assignment = self.parse_assignment()?;
                self.expect(TokenKind::Semicolon, "expected ';' after assignment")?;
                Ok(Statement::Assignment(assignment))
            }
            TokenKind::Identifier if self.peek_is(TokenKind::LParen) => {
                let call = self.parse_call()?;
                self.eat(TokenKind::Semicolon);
                Ok(Statement::Call(call))
            }
            _ => Err(self.error("expected a statement")),
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<VariableDeclaration> {
        self.expect(TokenKind::Var, "expected 'var'")?;
        let name = self
            .expect(TokenKind::Identifier, "expected variable name")?
            .text;
        self.expect(TokenKind::Colon, "expected ':' after variable name")?;
        let declared_type = self.parse_type()?;

        let initializer = if self.eat(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "expected ';' after declaration")?;
        Ok(VariableDeclaration {
            name,
            declared_type,
            initializer,
        })
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor> {
        let token = self.next_token();
        match token.kind {
            TokenKind::LBracket => {
                let mut entries = vec![self.parse_type()?];
                while self.eat(TokenKind::Comma) {
                    entries.push(self.parse_type()?);
                }
                self.expect(TokenKind::RBracket, "expected ']' after array type")?;
                Ok(TypeDescriptor::Array(entries))
            }
            TokenKind::Int => Ok(TypeDescriptor::Int),
            TokenKind::Float64 => Ok(TypeDescriptor::Real),
            TokenKind::String => Ok(TypeDescriptor::String),
            TokenKind::Bool => Ok(TypeDescriptor::Bool),
            _ => Err(ParseError::InvalidType { token }),
        }
    }

    fn parse_assignment(&mut self) -> Result<Assignment> {
        let target = self
            .expect(TokenKind::Identifier, "expected variable name")?
            .text;
        self.expect(TokenKind::Assign, "expected '='")?;
        let value = self.parse_expression()?;
        Ok(Assignment { target, value })
    }

    fn parse_function_declaration(&mut self) -> Result<FunctionDeclaration> {
        self.expect(TokenKind::Func, "expected 'func'")?;
        let name_token = self.expect(TokenKind::Identifier, "expected function name")?;
        self.expect(TokenKind::LParen, "expected '(' after function name")?;

        let mut parameters = vec![];
        if !self.cur_is(TokenKind::RParen) {
            loop {
                let name = self
                    .expect(TokenKind::Identifier, "expected parameter name")?
                    .text;
                self.expect(TokenKind::Colon, "expected ':' after parameter name")?;
                let declared_type = self.parse_type()?;
                parameters.push(Parameter {
                    name,
                    declared_type,
                });

                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after parameters")?;

        let return_type = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        if let Some(return_type) = &return_type {
            if !body.iter().any(Statement::contains_return) {
                return Err(ParseError::MissingReturn {
                    function: name_token.text.clone(),
                    return_type: return_type.clone(),
                    token: name_token,
                });
            }
        }

        Ok(FunctionDeclaration {
            name: name_token.text,
            return_type,
            parameters,
            body,
        })
    }

    fn parse_call(&mut self) -> Result<FunctionCall> {
        let name = self
            .expect(TokenKind::Identifier, "expected function name")?
            .text;
        self.expect(TokenKind::LParen, "expected '(' after function name")?;

        let mut arguments = vec![];
        if !self.cur_is(TokenKind::RParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after arguments")?;

        Ok(FunctionCall { name, arguments })
    }

    fn parse_if_statement(&mut self) -> Result<If> {
        self.expect(TokenKind::If, "expected 'if'")?;
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.eat(TokenKind::Else) {
            if self.cur_is(TokenKind::If) {
                vec![Statement::If(self.parse_if_statement()?)]
            } else {
                self.parse_block()?
            }
        } else {
            vec![]
        };

        Ok(If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_for_statement(&mut self) -> Result<For> {
        self.expect(TokenKind::For, "expected 'for'")?;
        self.expect(TokenKind::LParen, "expected '(' after 'for'")?;

        let init = self.parse_statement()?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after loop condition")?;
        let increment = self.parse_for_increment()?;

        self.expect(TokenKind::RParen, "expected ')' after loop clauses")?;
        let body = self.parse_block()?;

        Ok(For {
            init: Box::new(init),
            condition,
            increment: Box::new(increment),
            body,
        })
    }

    // The increment clause may omit the ';' before the closing parenthesis.
    fn parse_for_increment(&mut self) -> Result<Statement> {
        let kind = self.cur_token().kind;
        let statement = match kind {
            TokenKind::Identifier if self.peek_is(TokenKind::Assign) => {
                Statement::Assignment(self.parse_assignment()?)
            }
            TokenKind::Identifier if self.peek_is(TokenKind::LParen) => {
                Statement::Call(self.parse_call()?)
            }
            _ => return self.parse_statement(),
        };
        self.eat(TokenKind::Semicolon);
        Ok(statement)
    }

    fn parse_return_statement(&mut self) -> Result<Return> {
        self.expect(TokenKind::Return, "expected 'return'")?;

        let value = if self.cur_is(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenKind::Semicolon, "expected ';' after return statement")?;
        Ok(Return { value })
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>> {
        self.expect(TokenKind::LBrace, "expected '{'")?;

        let mut statements = vec![];
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RBrace, "expected '}'")?;
        Ok(statements)
    }

    pub fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Expression> {
        self.parse_left_associative(
            &[TokenKind::EqualEqual, TokenKind::NotEqual],
            Self::parse_comparison,
        )
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        self.parse_left_associative(
            &[
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> Result<Expression> {
        self.parse_left_associative(&[TokenKind::Plus, TokenKind::Minus], Self::parse_factor)
    }

    fn parse_factor(&mut self) -> Result<Expression> {
        self.parse_left_associative(&[TokenKind::Star, TokenKind::Slash], Self::parse_unary)
    }

    fn parse_left_associative(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> Result<Expression>,
    ) -> Result<Expression> {
        let mut left = operand(self)?;

        while let Some(operator) = self.match_operator(operators) {
            let right = operand(self)?;
            left = Expression::Binary(BinaryExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn match_operator(&mut self, operators: &[TokenKind]) -> Option<Operator> {
        let kind = self.cur_token().kind;
        if operators.contains(&kind) {
            self.next_token();
            Operator::from_token(kind)
        } else {
            None
        }
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        if self.eat(TokenKind::Bang) {
            let operand = self.parse_unary()?;
            return Ok(Expression::Unary(UnaryExpression {
                operator: UnaryOperator::Not,
                operand: Box::new(operand),
            }));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let kind = self.cur_token().kind;
        match kind {
            TokenKind::IntegerConstant | TokenKind::True | TokenKind::False => {
                let token = self.next_token();
                Ok(Expression::Literal(Literal::new(token.text)))
            }
            TokenKind::StringConstant => {
                let token = self.next_token();
                Ok(Expression::Literal(Literal::quoted(token.text)))
            }
            TokenKind::LBracket => {
                self.next_token();
                let mut elements = vec![];
                if !self.cur_is(TokenKind::RBracket) {
                    loop {
                        elements.push(self.parse_expression()?);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket, "expected ']' after array literal")?;
                Ok(Expression::Array(elements.into()))
            }
            TokenKind::Identifier if self.peek_is(TokenKind::LParen) => {
                self.parse_call().map(Expression::Call)
            }
            TokenKind::Identifier => {
                let token = self.next_token();
                let mut expression: Expression = Identifier::new(token.text).into();

                while self.eat(TokenKind::LBracket) {
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "expected ']' after array index")?;
                    expression = Expression::Index(ArrayAccess {
                        array: Box::new(expression),
                        index: Box::new(index),
                    });
                }

                Ok(expression)
            }
            TokenKind::LParen => {
                self.next_token();
                let expression = self.parse_expression()?;
                self.expect(TokenKind::RParen, "expected ')' after expression")?;
                Ok(expression)
            }
            _ => Err(self.error("expected an expression")),
        }
    }
}
