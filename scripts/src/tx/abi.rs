//! ABI encoding of what we send on chain

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes},
};

/// ABI encode the constructor arguments, as the parameters of `constructor(address, ...)`
pub fn encode_constructor_args(args: &[Address]) -> Vec<u8> {
    DynSolValue::Tuple(args.iter().copied().map(DynSolValue::Address).collect())
        .abi_encode_params()
}

/// Build the creation calldata: bytecode followed by the encoded constructor arguments
pub fn build_deploy_code(bytecode: &Bytes, args: &[Address]) -> Bytes {
    let mut code = bytecode.to_vec();
    code.extend(encode_constructor_args(args));
    code.into()
}
