//! Binary class record decoding
//!
//! Decodes a compiled class record into an owned model. Only the parts of the
//! format that can carry a symbolic type reference are materialised: the
//! header, member descriptors and signatures, annotations, exception tables,
//! local variable tables and the reference-bearing bytecode instructions.
//! Everything else is skipped by length.

use thiserror::Error;

use crate::parsers::descriptor::DescriptorError;

const MAGIC: u32 = 0xCAFE_BABE;

/// Errors raised while decoding a class record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassFileError {
    #[error("bad magic number 0x{0:08X}")]
    BadMagic(u32),

    #[error("unexpected end of data at offset {offset}: {needed} more bytes needed")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("invalid constant pool tag {tag} at index {index}")]
    InvalidConstantTag { index: u16, tag: u8 },

    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },

    #[error("constant pool index {index} is not a {expected} entry")]
    ConstantType { index: u16, expected: &'static str },

    #[error("constant pool index {index} holds invalid modified UTF-8")]
    InvalidUtf8 { index: u16 },

    #[error("unknown opcode 0x{opcode:02X} at bytecode offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },

    #[error("invalid switch bounds at bytecode offset {offset}")]
    InvalidSwitch { offset: usize },

    #[error("invalid annotation element tag '{tag}' at offset {offset}")]
    InvalidElementTag { tag: char, offset: usize },

    #[error("{attribute} attribute has {remaining} trailing bytes")]
    TrailingBytes { attribute: String, remaining: usize },

    #[error("invalid descriptor in {context}: {source}")]
    Descriptor {
        context: String,
        #[source]
        source: DescriptorError,
    },
}

pub type DecodeResult<T> = std::result::Result<T, ClassFileError>;

/// Bounds-checked big-endian reader
///
/// `base` is the absolute offset of `data` within the record so errors point
/// into the original buffer even from attribute sub-readers.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, base: 0 }
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn bytes(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(ClassFileError::UnexpectedEof {
                offset: self.offset(),
                needed: len - self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u1(&mut self) -> DecodeResult<u8> {
        Ok(self.bytes(1)?[0])
    }

    fn u2(&mut self) -> DecodeResult<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u4(&mut self) -> DecodeResult<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u8(&mut self) -> DecodeResult<u64> {
        let high = self.u4()? as u64;
        let low = self.u4()? as u64;
        Ok((high << 32) | low)
    }

    /// Split off a reader over the next `len` bytes
    fn sub(&mut self, len: usize) -> DecodeResult<Reader<'a>> {
        let base = self.offset();
        let data = self.bytes(len)?;
        Ok(Reader { data, pos: 0, base })
    }
}

/// One constant pool slot
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Slot 0 and the second half of a Long or Double
    Unusable,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

/// A resolved field or method reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub owner: String,
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let count = reader.u2()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);

        let mut index: u16 = 1;
        while index < count {
            let tag = reader.u1()?;
            let constant = match tag {
                1 => {
                    let len = reader.u2()? as usize;
                    let raw = reader.bytes(len)?;
                    let text = decode_modified_utf8(raw).ok_or(ClassFileError::InvalidUtf8 { index })?;
                    Constant::Utf8(text)
                }
                3 => Constant::Integer(reader.u4()? as i32),
                4 => Constant::Float(f32::from_bits(reader.u4()?)),
                5 => Constant::Long(reader.u8()? as i64),
                6 => Constant::Double(f64::from_bits(reader.u8()?)),
                7 => Constant::Class { name_index: reader.u2()? },
                8 => Constant::String { string_index: reader.u2()? },
                9 => Constant::FieldRef {
                    class_index: reader.u2()?,
                    name_and_type_index: reader.u2()?,
                },
                10 => Constant::MethodRef {
                    class_index: reader.u2()?,
                    name_and_type_index: reader.u2()?,
                },
                11 => Constant::InterfaceMethodRef {
                    class_index: reader.u2()?,
                    name_and_type_index: reader.u2()?,
                },
                12 => Constant::NameAndType {
                    name_index: reader.u2()?,
                    descriptor_index: reader.u2()?,
                },
                15 => Constant::MethodHandle {
                    kind: reader.u1()?,
                    reference_index: reader.u2()?,
                },
                16 => Constant::MethodType { descriptor_index: reader.u2()? },
                17 => Constant::Dynamic {
                    bootstrap_index: reader.u2()?,
                    name_and_type_index: reader.u2()?,
                },
                18 => Constant::InvokeDynamic {
                    bootstrap_index: reader.u2()?,
                    name_and_type_index: reader.u2()?,
                },
                19 => Constant::Module { name_index: reader.u2()? },
                20 => Constant::Package { name_index: reader.u2()? },
                _ => return Err(ClassFileError::InvalidConstantTag { index, tag }),
            };

            let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
            entries.push(constant);
            if wide {
                entries.push(Constant::Unusable);
                index = index.saturating_add(2);
            } else {
                index += 1;
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: u16) -> DecodeResult<&Constant> {
        match self.entries.get(index as usize) {
            None | Some(Constant::Unusable) => Err(ClassFileError::InvalidConstantIndex { index }),
            Some(constant) => Ok(constant),
        }
    }

    pub fn utf8(&self, index: u16) -> DecodeResult<&str> {
        match self.get(index)? {
            Constant::Utf8(text) => Ok(text),
            _ => Err(ClassFileError::ConstantType { index, expected: "Utf8" }),
        }
    }

    pub fn class_name(&self, index: u16) -> DecodeResult<&str> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassFileError::ConstantType { index, expected: "Class" }),
        }
    }

    /// Index 0 stands for "none" in a few header and handler slots
    pub fn optional_class_name(&self, index: u16) -> DecodeResult<Option<&str>> {
        if index == 0 {
            Ok(None)
        } else {
            self.class_name(index).map(Some)
        }
    }

    pub fn name_and_type(&self, index: u16) -> DecodeResult<(&str, &str)> {
        match self.get(index)? {
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            _ => Err(ClassFileError::ConstantType { index, expected: "NameAndType" }),
        }
    }

    pub fn member_ref(&self, index: u16) -> DecodeResult<MemberRef> {
        let (class_index, nat_index) = match self.get(index)? {
            Constant::FieldRef {
                class_index,
                name_and_type_index,
            }
            | Constant::MethodRef {
                class_index,
                name_and_type_index,
            }
            | Constant::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => (*class_index, *name_and_type_index),
            _ => return Err(ClassFileError::ConstantType { index, expected: "member reference" }),
        };
        let (name, descriptor) = self.name_and_type(nat_index)?;
        Ok(MemberRef {
            owner: self.class_name(class_index)?.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    fn loadable(&self, index: u16) -> DecodeResult<Option<LoadableConstant>> {
        let loadable = match self.get(index)? {
            Constant::Class { name_index } => LoadableConstant::Class(self.utf8(*name_index)?.to_string()),
            Constant::MethodType { descriptor_index } => {
                LoadableConstant::MethodType(self.utf8(*descriptor_index)?.to_string())
            }
            Constant::MethodHandle { kind, reference_index } => LoadableConstant::MethodHandle {
                kind: *kind,
                target: self.member_ref(*reference_index)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(loadable))
    }
}

/// Decode the JVM's modified UTF-8 encoding
///
/// Encoded NUL (`C0 80`) and surrogate pairs written as two three-byte
/// sequences are accepted. Returns `None` on malformed input.
pub fn decode_modified_utf8(raw: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(raw) {
        if !text.contains('\0') {
            return Some(text.to_string());
        }
    }

    let mut units = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let b0 = raw[i] as u16;
        match raw[i] {
            0x01..=0x7F => {
                units.push(b0);
                i += 1;
            }
            0xC0..=0xDF => {
                let b1 = continuation(raw.get(i + 1))?;
                units.push(((b0 & 0x1F) << 6) | b1);
                i += 2;
            }
            0xE0..=0xEF => {
                let b1 = continuation(raw.get(i + 1))?;
                let b2 = continuation(raw.get(i + 2))?;
                units.push(((b0 & 0x0F) << 12) | (b1 << 6) | b2);
                i += 3;
            }
            _ => return None,
        }
    }

    String::from_utf16(&units).ok()
}

fn continuation(byte: Option<&u8>) -> Option<u16> {
    match byte {
        Some(b) if b & 0xC0 == 0x80 => Some((b & 0x3F) as u16),
        _ => None,
    }
}

/// Value of an annotation element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// Primitive or string constant, identified by its tag
    Const(char),
    Enum { type_descriptor: String, const_name: String },
    /// Class literal, stored as a return descriptor (`V` for void)
    Class(String),
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub type_descriptor: String,
    pub elements: Vec<(String, ElementValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadableConstant {
    Class(String),
    MethodType(String),
    MethodHandle { kind: u8, target: MemberRef },
}

/// A reference-bearing bytecode instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `new`, `anewarray`, `checkcast` or `instanceof`
    Type { opcode: u8, offset: usize, class_name: String },
    /// `getstatic`, `putstatic`, `getfield` or `putfield`
    Field { opcode: u8, offset: usize, target: MemberRef },
    /// `invokevirtual`, `invokespecial`, `invokestatic` or `invokeinterface`
    Method { opcode: u8, offset: usize, target: MemberRef },
    InvokeDynamic { offset: usize, name: String, descriptor: String },
    /// `ldc` or `ldc_w` of a class, method type or method handle
    LoadConstant { offset: usize, constant: LoadableConstant },
    MultiANewArray { offset: usize, descriptor: String, dimensions: u8 },
}

pub mod opcodes {
    pub const LDC: u8 = 0x12;
    pub const LDC_W: u8 = 0x13;
    pub const IINC: u8 = 0x84;
    pub const TABLESWITCH: u8 = 0xAA;
    pub const LOOKUPSWITCH: u8 = 0xAB;
    pub const GETSTATIC: u8 = 0xB2;
    pub const PUTSTATIC: u8 = 0xB3;
    pub const GETFIELD: u8 = 0xB4;
    pub const PUTFIELD: u8 = 0xB5;
    pub const INVOKEVIRTUAL: u8 = 0xB6;
    pub const INVOKESPECIAL: u8 = 0xB7;
    pub const INVOKESTATIC: u8 = 0xB8;
    pub const INVOKEINTERFACE: u8 = 0xB9;
    pub const INVOKEDYNAMIC: u8 = 0xBA;
    pub const NEW: u8 = 0xBB;
    pub const ANEWARRAY: u8 = 0xBD;
    pub const CHECKCAST: u8 = 0xC0;
    pub const INSTANCEOF: u8 = 0xC1;
    pub const WIDE: u8 = 0xC4;
    pub const MULTIANEWARRAY: u8 = 0xC5;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandler {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    /// `None` for `finally` handlers
    pub catch_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    pub name: String,
    /// Descriptor in the LocalVariableTable, signature in the LocalVariableTypeTable
    pub descriptor: String,
    pub index: u16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub instructions: Vec<Instruction>,
    pub exception_handlers: Vec<ExceptionHandler>,
    pub local_variables: Vec<LocalVariable>,
    pub local_variable_types: Vec<LocalVariable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub exceptions: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub parameter_annotations: Vec<Vec<Annotation>>,
    pub annotation_default: Option<ElementValue>,
    pub code: Option<Code>,
}

/// Decoded class record
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub annotations: Vec<Annotation>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

impl ClassFile {
    /// Decode a complete class record
    pub fn parse(bytes: &[u8]) -> DecodeResult<Self> {
        let mut reader = Reader::new(bytes);

        let magic = reader.u4()?;
        if magic != MAGIC {
            return Err(ClassFileError::BadMagic(magic));
        }
        let minor_version = reader.u2()?;
        let major_version = reader.u2()?;
        let pool = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.u2()?;
        let this_class = pool.class_name(reader.u2()?)?.to_string();
        let super_class = pool.optional_class_name(reader.u2()?)?.map(str::to_string);

        let interface_count = reader.u2()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(reader.u2()?)?.to_string());
        }

        let field_count = reader.u2()?;
        let mut fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            fields.push(parse_field(&mut reader, &pool)?);
        }

        let method_count = reader.u2()?;
        let mut methods = Vec::with_capacity(method_count as usize);
        for _ in 0..method_count {
            methods.push(parse_method(&mut reader, &pool)?);
        }

        let mut signature = None;
        let mut annotations = Vec::new();
        for_each_attribute(&mut reader, &pool, |name, body| {
            match name {
                "Signature" => signature = Some(pool.utf8(body.u2()?)?.to_string()),
                "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                    annotations.extend(parse_annotations(body, &pool)?)
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;

        Ok(Self {
            minor_version,
            major_version,
            constant_pool: pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            signature,
            annotations,
            fields,
            methods,
        })
    }
}

/// Walk an attribute table, handing each body to `handle`
///
/// `handle` returns `false` for attributes it does not know, which are then
/// skipped by length. Known attributes must consume their body exactly.
fn for_each_attribute<'a, F>(reader: &mut Reader<'a>, pool: &ConstantPool, mut handle: F) -> DecodeResult<()>
where
    F: FnMut(&str, &mut Reader<'a>) -> DecodeResult<bool>,
{
    let count = reader.u2()?;
    for _ in 0..count {
        let name = pool.utf8(reader.u2()?)?;
        let len = reader.u4()? as usize;
        let mut body = reader.sub(len)?;
        if handle(name, &mut body)? && body.remaining() != 0 {
            return Err(ClassFileError::TrailingBytes {
                attribute: name.to_string(),
                remaining: body.remaining(),
            });
        }
    }
    Ok(())
}

fn parse_field(reader: &mut Reader<'_>, pool: &ConstantPool) -> DecodeResult<FieldInfo> {
    let access_flags = reader.u2()?;
    let name = pool.utf8(reader.u2()?)?.to_string();
    let descriptor = pool.utf8(reader.u2()?)?.to_string();

    let mut signature = None;
    let mut annotations = Vec::new();
    for_each_attribute(reader, pool, |attribute, body| {
        match attribute {
            "Signature" => signature = Some(pool.utf8(body.u2()?)?.to_string()),
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                annotations.extend(parse_annotations(body, pool)?)
            }
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(FieldInfo {
        access_flags,
        name,
        descriptor,
        signature,
        annotations,
    })
}

fn parse_method(reader: &mut Reader<'_>, pool: &ConstantPool) -> DecodeResult<MethodInfo> {
    let access_flags = reader.u2()?;
    let name = pool.utf8(reader.u2()?)?.to_string();
    let descriptor = pool.utf8(reader.u2()?)?.to_string();

    let mut method = MethodInfo {
        access_flags,
        name,
        descriptor,
        signature: None,
        exceptions: Vec::new(),
        annotations: Vec::new(),
        parameter_annotations: Vec::new(),
        annotation_default: None,
        code: None,
    };

    for_each_attribute(reader, pool, |attribute, body| {
        match attribute {
            "Signature" => method.signature = Some(pool.utf8(body.u2()?)?.to_string()),
            "Exceptions" => {
                let count = body.u2()?;
                for _ in 0..count {
                    method.exceptions.push(pool.class_name(body.u2()?)?.to_string());
                }
            }
            "Code" => method.code = Some(parse_code(body, pool)?),
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                method.annotations.extend(parse_annotations(body, pool)?)
            }
            "RuntimeVisibleParameterAnnotations" | "RuntimeInvisibleParameterAnnotations" => {
                let parameters = body.u1()?;
                for parameter in 0..parameters as usize {
                    let annotations = parse_annotations(body, pool)?;
                    if method.parameter_annotations.len() <= parameter {
                        method.parameter_annotations.resize(parameter + 1, Vec::new());
                    }
                    method.parameter_annotations[parameter].extend(annotations);
                }
            }
            "AnnotationDefault" => method.annotation_default = Some(parse_element_value(body, pool)?),
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(method)
}

fn parse_annotations(reader: &mut Reader<'_>, pool: &ConstantPool) -> DecodeResult<Vec<Annotation>> {
    let count = reader.u2()?;
    let mut annotations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        annotations.push(parse_annotation(reader, pool)?);
    }
    Ok(annotations)
}

fn parse_annotation(reader: &mut Reader<'_>, pool: &ConstantPool) -> DecodeResult<Annotation> {
    let type_descriptor = pool.utf8(reader.u2()?)?.to_string();
    let pairs = reader.u2()?;
    let mut elements = Vec::with_capacity(pairs as usize);
    for _ in 0..pairs {
        let name = pool.utf8(reader.u2()?)?.to_string();
        elements.push((name, parse_element_value(reader, pool)?));
    }
    Ok(Annotation {
        type_descriptor,
        elements,
    })
}

fn parse_element_value(reader: &mut Reader<'_>, pool: &ConstantPool) -> DecodeResult<ElementValue> {
    let offset = reader.offset();
    let tag = reader.u1()? as char;
    let value = match tag {
        'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' | 's' => {
            pool.get(reader.u2()?)?;
            ElementValue::Const(tag)
        }
        'e' => ElementValue::Enum {
            type_descriptor: pool.utf8(reader.u2()?)?.to_string(),
            const_name: pool.utf8(reader.u2()?)?.to_string(),
        },
        'c' => ElementValue::Class(pool.utf8(reader.u2()?)?.to_string()),
        '@' => ElementValue::Annotation(parse_annotation(reader, pool)?),
        '[' => {
            let count = reader.u2()?;
            let mut values = Vec::with_capacity(count as usize);
            for _ in 0..count {
                values.push(parse_element_value(reader, pool)?);
            }
            ElementValue::Array(values)
        }
        _ => return Err(ClassFileError::InvalidElementTag { tag, offset }),
    };
    Ok(value)
}

fn parse_code(reader: &mut Reader<'_>, pool: &ConstantPool) -> DecodeResult<Code> {
    let max_stack = reader.u2()?;
    let max_locals = reader.u2()?;
    let code_length = reader.u4()? as usize;
    let code_base = reader.offset();
    let bytecode = reader.bytes(code_length)?;
    let instructions = decode_instructions(bytecode, code_base, pool)?;

    let handler_count = reader.u2()?;
    let mut exception_handlers = Vec::with_capacity(handler_count as usize);
    for _ in 0..handler_count {
        exception_handlers.push(ExceptionHandler {
            start_pc: reader.u2()?,
            end_pc: reader.u2()?,
            handler_pc: reader.u2()?,
            catch_type: pool.optional_class_name(reader.u2()?)?.map(str::to_string),
        });
    }

    let mut local_variables = Vec::new();
    let mut local_variable_types = Vec::new();
    for_each_attribute(reader, pool, |attribute, body| {
        let table = match attribute {
            "LocalVariableTable" => &mut local_variables,
            "LocalVariableTypeTable" => &mut local_variable_types,
            _ => return Ok(false),
        };
        let count = body.u2()?;
        for _ in 0..count {
            let _start_pc = body.u2()?;
            let _length = body.u2()?;
            let name = pool.utf8(body.u2()?)?.to_string();
            let descriptor = pool.utf8(body.u2()?)?.to_string();
            let index = body.u2()?;
            table.push(LocalVariable { name, descriptor, index });
        }
        Ok(true)
    })?;

    Ok(Code {
        max_stack,
        max_locals,
        instructions,
        exception_handlers,
        local_variables,
        local_variable_types,
    })
}

/// Walk the bytecode and keep the instructions that reference types
fn decode_instructions(code: &[u8], base: usize, pool: &ConstantPool) -> DecodeResult<Vec<Instruction>> {
    use opcodes::*;

    let mut instructions = Vec::new();
    let mut pc = 0;
    while pc < code.len() {
        let opcode = code[pc];
        let len = instruction_length(code, pc)?;
        if pc + len > code.len() {
            return Err(ClassFileError::UnexpectedEof {
                offset: base + pc,
                needed: pc + len - code.len(),
            });
        }
        let operand = |at: usize| u16::from_be_bytes([code[pc + at], code[pc + at + 1]]);

        let instruction = match opcode {
            NEW | ANEWARRAY | CHECKCAST | INSTANCEOF => Some(Instruction::Type {
                opcode,
                offset: pc,
                class_name: pool.class_name(operand(1))?.to_string(),
            }),
            GETSTATIC | PUTSTATIC | GETFIELD | PUTFIELD => Some(Instruction::Field {
                opcode,
                offset: pc,
                target: pool.member_ref(operand(1))?,
            }),
            INVOKEVIRTUAL | INVOKESPECIAL | INVOKESTATIC | INVOKEINTERFACE => Some(Instruction::Method {
                opcode,
                offset: pc,
                target: pool.member_ref(operand(1))?,
            }),
            INVOKEDYNAMIC => {
                let index = operand(1);
                match pool.get(index)? {
                    Constant::InvokeDynamic {
                        name_and_type_index, ..
                    } => {
                        let (name, descriptor) = pool.name_and_type(*name_and_type_index)?;
                        Some(Instruction::InvokeDynamic {
                            offset: pc,
                            name: name.to_string(),
                            descriptor: descriptor.to_string(),
                        })
                    }
                    _ => return Err(ClassFileError::ConstantType { index, expected: "InvokeDynamic" }),
                }
            }
            LDC | LDC_W => {
                let index = if opcode == LDC { code[pc + 1] as u16 } else { operand(1) };
                pool.loadable(index)?
                    .map(|constant| Instruction::LoadConstant { offset: pc, constant })
            }
            MULTIANEWARRAY => Some(Instruction::MultiANewArray {
                offset: pc,
                descriptor: pool.class_name(operand(1))?.to_string(),
                dimensions: code[pc + 3],
            }),
            _ => None,
        };

        instructions.extend(instruction);
        pc += len;
    }

    Ok(instructions)
}

/// Total encoded length of the instruction at `pc`, operands included
fn instruction_length(code: &[u8], pc: usize) -> DecodeResult<usize> {
    let opcode = code[pc];
    let len = match opcode {
        0x00..=0x0F => 1,
        0x10 => 2,
        0x11 => 3,
        0x12 => 2,
        0x13 | 0x14 => 3,
        0x15..=0x19 => 2,
        0x1A..=0x35 => 1,
        0x36..=0x3A => 2,
        0x3B..=0x83 => 1,
        opcodes::IINC => 3,
        0x85..=0x98 => 1,
        0x99..=0xA8 => 3,
        0xA9 => 2,
        opcodes::TABLESWITCH | opcodes::LOOKUPSWITCH => return switch_length(code, pc),
        0xAC..=0xB1 => 1,
        0xB2..=0xB8 => 3,
        0xB9 | 0xBA => 5,
        0xBB => 3,
        0xBC => 2,
        0xBD => 3,
        0xBE | 0xBF => 1,
        0xC0 | 0xC1 => 3,
        0xC2 | 0xC3 => 1,
        opcodes::WIDE => match code.get(pc + 1) {
            Some(&opcodes::IINC) => 6,
            Some(_) => 4,
            None => {
                return Err(ClassFileError::UnexpectedEof {
                    offset: pc + 1,
                    needed: 1,
                })
            }
        },
        0xC5 => 4,
        0xC6 | 0xC7 => 3,
        0xC8 | 0xC9 => 5,
        _ => return Err(ClassFileError::UnknownOpcode { opcode, offset: pc }),
    };
    Ok(len)
}

/// Length of a `tableswitch` or `lookupswitch`, including alignment padding
fn switch_length(code: &[u8], pc: usize) -> DecodeResult<usize> {
    let padding = (4 - (pc + 1) % 4) % 4;
    let operands = pc + 1 + padding;
    let read_i32 = |at: usize| -> DecodeResult<i64> {
        code.get(at..at + 4)
            .map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as i64)
            .ok_or(ClassFileError::UnexpectedEof {
                offset: at,
                needed: (at + 4).saturating_sub(code.len()),
            })
    };

    let body = if code[pc] == opcodes::TABLESWITCH {
        let low = read_i32(operands + 4)?;
        let high = read_i32(operands + 8)?;
        if high < low {
            return Err(ClassFileError::InvalidSwitch { offset: pc });
        }
        12 + (high - low + 1) * 4
    } else {
        let pairs = read_i32(operands + 4)?;
        if pairs < 0 {
            return Err(ClassFileError::InvalidSwitch { offset: pc });
        }
        8 + pairs * 8
    };

    Ok(1 + padding + body as usize)
}
