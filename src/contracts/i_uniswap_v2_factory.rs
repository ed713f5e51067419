use ethers::prelude::abigen;

abigen!(
    IUniswapV2Factory,
    r#"[
        function getPair(address tokenA, address tokenB) external view returns (address pair)
        function allPairsLength() external view returns (uint256)
        function allPairs(uint256) external view returns (address pair)
    ]"#
);
