//! Type descriptors and the closed kind classification.
//!
//! Every value carries a type, and every type belongs to exactly one kind
//! out of a closed set. The kind decides which structural queries are
//! defined: asking an integer type for its array length is a misuse of the
//! API, not a runtime condition, so the kind-gated accessors check their
//! precondition and panic on violation instead of returning garbage.

use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use llvm_sys::core::{
    LLVMAlignOf, LLVMCountParamTypes, LLVMCountStructElementTypes, LLVMDumpType,
    LLVMGetArrayLength, LLVMGetElementType, LLVMGetIntTypeWidth, LLVMGetParamTypes,
    LLVMGetPointerAddressSpace, LLVMGetReturnType, LLVMGetStructElementTypes, LLVMGetStructName,
    LLVMGetTypeContext, LLVMGetTypeKind, LLVMGetVectorSize, LLVMIsFunctionVarArg,
    LLVMIsOpaqueStruct, LLVMIsPackedStruct, LLVMPointerTypeIsOpaque, LLVMPrintTypeToString,
    LLVMSizeOf, LLVMStructGetTypeAtIndex,
};
use llvm_sys::prelude::LLVMTypeRef;
use llvm_sys::target::LLVMOffsetOfElement;
use llvm_sys::{LLVMType, LLVMTypeKind};

use crate::context::Context;
use crate::handle::Handle;
use crate::marshal;
use crate::target::TargetData;
use crate::value::Value;

/// The closed classification of IR types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Void, i.e. no type.
    Void,
    /// 16 bit floating point type.
    Half,
    /// 32 bit floating point type.
    Float,
    /// 64 bit floating point type.
    Double,
    /// 80 bit floating point type (X87).
    X86_FP80,
    /// 128 bit floating point type (112-bit mantissa).
    FP128,
    /// 128 bit floating point type (two 64-bits).
    PPC_FP128,
    /// Labels.
    Label,
    /// Arbitrary bit width integers.
    Integer,
    /// Functions.
    Function,
    /// Structures.
    Struct,
    /// Arrays.
    Array,
    /// Pointers.
    Pointer,
    /// SIMD packed format, or other vector type.
    Vector,
    /// Metadata.
    Metadata,
    /// X86 MMX.
    X86_MMX,
    /// Tokens.
    Token,
}

impl TypeKind {
    fn from_raw(raw: LLVMTypeKind) -> TypeKind {
        match raw {
            LLVMTypeKind::LLVMVoidTypeKind => TypeKind::Void,
            LLVMTypeKind::LLVMHalfTypeKind => TypeKind::Half,
            LLVMTypeKind::LLVMFloatTypeKind => TypeKind::Float,
            LLVMTypeKind::LLVMDoubleTypeKind => TypeKind::Double,
            LLVMTypeKind::LLVMX86_FP80TypeKind => TypeKind::X86_FP80,
            LLVMTypeKind::LLVMFP128TypeKind => TypeKind::FP128,
            LLVMTypeKind::LLVMPPC_FP128TypeKind => TypeKind::PPC_FP128,
            LLVMTypeKind::LLVMLabelTypeKind => TypeKind::Label,
            LLVMTypeKind::LLVMIntegerTypeKind => TypeKind::Integer,
            LLVMTypeKind::LLVMFunctionTypeKind => TypeKind::Function,
            LLVMTypeKind::LLVMStructTypeKind => TypeKind::Struct,
            LLVMTypeKind::LLVMArrayTypeKind => TypeKind::Array,
            LLVMTypeKind::LLVMPointerTypeKind => TypeKind::Pointer,
            LLVMTypeKind::LLVMVectorTypeKind => TypeKind::Vector,
            LLVMTypeKind::LLVMMetadataTypeKind => TypeKind::Metadata,
            LLVMTypeKind::LLVMX86_MMXTypeKind => TypeKind::X86_MMX,
            LLVMTypeKind::LLVMTokenTypeKind => TypeKind::Token,
            #[allow(unreachable_patterns)]
            other => panic!("unhandled type kind {other:?}"),
        }
    }
}

/// A structural descriptor of an IR type, owned by its [`Context`].
///
/// Types are uniqued per context and never disposed individually, so the
/// wrapper is a plain copyable reference; identity is by handle address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef<'a> {
    handle: Handle<LLVMType>,
    _arena: PhantomData<&'a ()>,
}

impl<'a> TypeRef<'a> {
    pub(crate) fn from_raw(raw: LLVMTypeRef) -> Option<TypeRef<'a>> {
        Handle::new(raw).map(|handle| TypeRef {
            handle,
            _arena: PhantomData,
        })
    }

    pub(crate) fn raw(self) -> LLVMTypeRef {
        self.handle.as_ptr()
    }

    /// The address of the underlying handle.
    pub fn address(self) -> usize {
        self.handle.addr()
    }

    /// The kind of this type.
    pub fn kind(self) -> TypeKind {
        TypeKind::from_raw(unsafe { LLVMGetTypeKind(self.raw()) })
    }

    fn expect_kind(self, expected: TypeKind) {
        let kind = self.kind();
        assert!(
            kind == expected,
            "expected {expected:?} type, found {kind:?}"
        );
    }

    /// The context this type is associated with, as a non-owning wrapper.
    pub fn context(self) -> Context {
        Context::from_raw_unowned(unsafe { LLVMGetTypeContext(self.raw()) })
    }

    /// The bit width of this integer type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Integer`].
    pub fn int_width(self) -> u32 {
        self.expect_kind(TypeKind::Integer);
        unsafe { LLVMGetIntTypeWidth(self.raw()) }
    }

    /// Whether this function type accepts variadic arguments.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Function`].
    pub fn is_var_arg(self) -> bool {
        self.expect_kind(TypeKind::Function);
        marshal::from_llvm_bool(unsafe { LLVMIsFunctionVarArg(self.raw()) })
    }

    /// The return type of this function type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Function`].
    pub fn return_type(self) -> TypeRef<'a> {
        self.expect_kind(TypeKind::Function);
        TypeRef::from_raw(unsafe { LLVMGetReturnType(self.raw()) })
            .expect("function type has no return type")
    }

    /// The number of parameters this function type accepts.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Function`].
    pub fn count_param_types(self) -> u32 {
        self.expect_kind(TypeKind::Function);
        unsafe { LLVMCountParamTypes(self.raw()) }
    }

    /// The parameter types of this function type, in order.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Function`].
    pub fn param_types(self) -> Vec<TypeRef<'a>> {
        let count = self.count_param_types() as usize;
        let mut raw = vec![ptr::null_mut(); count];
        if count > 0 {
            unsafe { LLVMGetParamTypes(self.raw(), raw.as_mut_ptr()) };
        }
        raw.into_iter()
            .map(|ty| TypeRef::from_raw(ty).expect("parameter type handle is null"))
            .collect()
    }

    /// The number of members of this struct type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Struct`].
    pub fn count_struct_element_types(self) -> u32 {
        self.expect_kind(TypeKind::Struct);
        unsafe { LLVMCountStructElementTypes(self.raw()) }
    }

    /// The member types of this struct type, in order.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Struct`].
    pub fn struct_element_types(self) -> Vec<TypeRef<'a>> {
        let count = self.count_struct_element_types() as usize;
        let mut raw = vec![ptr::null_mut(); count];
        if count > 0 {
            unsafe { LLVMGetStructElementTypes(self.raw(), raw.as_mut_ptr()) };
        }
        raw.into_iter()
            .map(|ty| TypeRef::from_raw(ty).expect("struct member type handle is null"))
            .collect()
    }

    /// The member type of this struct type at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Struct`] or `index` is out of
    /// range.
    pub fn struct_element_type(self, index: u32) -> TypeRef<'a> {
        assert!(
            index < self.count_struct_element_types(),
            "struct member index {index} out of range"
        );
        TypeRef::from_raw(unsafe { LLVMStructGetTypeAtIndex(self.raw(), index) })
            .expect("struct member type handle is null")
    }

    /// Whether this is a named struct type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Struct`].
    pub fn is_named_struct(self) -> bool {
        self.expect_kind(TypeKind::Struct);
        unsafe { !LLVMGetStructName(self.raw()).is_null() }
    }

    /// The name of this struct type.
    ///
    /// # Panics
    ///
    /// Panics if [`TypeRef::is_named_struct`] does not hold.
    pub fn struct_name(self) -> String {
        assert!(self.is_named_struct(), "type is not a named struct");
        unsafe { marshal::cstr_to_string(LLVMGetStructName(self.raw())) }.unwrap_or_default()
    }

    /// Whether this struct type is packed.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Struct`].
    pub fn is_packed_struct(self) -> bool {
        self.expect_kind(TypeKind::Struct);
        marshal::from_llvm_bool(unsafe { LLVMIsPackedStruct(self.raw()) })
    }

    /// Whether this struct type is opaque.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Struct`].
    pub fn is_opaque_struct(self) -> bool {
        self.expect_kind(TypeKind::Struct);
        marshal::from_llvm_bool(unsafe { LLVMIsOpaqueStruct(self.raw()) })
    }

    /// Whether this pointer type carries no pointee type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Pointer`].
    pub fn is_opaque_pointer(self) -> bool {
        self.expect_kind(TypeKind::Pointer);
        marshal::from_llvm_bool(unsafe { LLVMPointerTypeIsOpaque(self.raw()) })
    }

    /// The element type of this array, vector or (non-opaque) pointer type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is none of [`TypeKind::Array`],
    /// [`TypeKind::Vector`] or [`TypeKind::Pointer`], or if the type is an
    /// opaque pointer, whose pointee the foreign side no longer records.
    pub fn element_type(self) -> TypeRef<'a> {
        let kind = self.kind();
        assert!(
            matches!(kind, TypeKind::Array | TypeKind::Vector | TypeKind::Pointer),
            "expected Array, Vector or Pointer type, found {kind:?}"
        );
        if kind == TypeKind::Pointer {
            assert!(
                !self.is_opaque_pointer(),
                "opaque pointer carries no element type"
            );
        }
        TypeRef::from_raw(unsafe { LLVMGetElementType(self.raw()) })
            .expect("element type handle is null")
    }

    /// The number of elements of this array type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Array`].
    pub fn array_length(self) -> u32 {
        self.expect_kind(TypeKind::Array);
        unsafe { LLVMGetArrayLength(self.raw()) }
    }

    /// The address space of this pointer type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Pointer`].
    pub fn pointer_address_space(self) -> u32 {
        self.expect_kind(TypeKind::Pointer);
        unsafe { LLVMGetPointerAddressSpace(self.raw()) }
    }

    /// The number of elements of this vector type.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Vector`].
    pub fn vector_size(self) -> u32 {
        self.expect_kind(TypeKind::Vector);
        unsafe { LLVMGetVectorSize(self.raw()) }
    }

    /// The offset of the struct member at `index` under the given data
    /// layout, in bytes.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not [`TypeKind::Struct`] or `index` is out of
    /// range.
    pub fn offset_of_element(self, index: u32, target_data: &TargetData) -> u64 {
        assert!(
            index < self.count_struct_element_types(),
            "struct member index {index} out of range"
        );
        unsafe { LLVMOffsetOfElement(target_data.raw(), self.raw(), index) }
    }

    /// The alignment of this type, as a target-dependent constant value.
    pub fn align_of(self) -> Value<'a> {
        Value::from_raw(unsafe { LLVMAlignOf(self.raw()) }).expect("alignment handle is null")
    }

    /// The size of this type, as a target-dependent constant value.
    pub fn size_of(self) -> Value<'a> {
        Value::from_raw(unsafe { LLVMSizeOf(self.raw()) }).expect("size handle is null")
    }

    /// Dumps a representation of this type to stderr.
    pub fn dump(self) {
        unsafe { LLVMDumpType(self.raw()) };
    }
}

impl fmt::Display for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = unsafe { marshal::take_message(LLVMPrintTypeToString(self.raw())) };
        f.write_str(&text)
    }
}

impl fmt::Debug for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.handle).finish()
    }
}
