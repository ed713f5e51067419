use ethers::prelude::abigen;

// `name()` is optional in practice; plenty of deployed tokens omit it, and
// the token resolver treats a failed read as a missing field.
abigen!(
    Erc20,
    r#"[
        function symbol() external view returns (string)
        function decimals() external view returns (uint8)
        function name() external view returns (string)
    ]"#
);
