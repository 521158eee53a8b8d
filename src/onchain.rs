use alloy::sol;

// Generate bindings for the Crypto Dev exchange. The exchange is itself the
// ERC20 that represents LP shares, so totalSupply/balanceOf refer to LP tokens.
sol!(
    #[derive(Debug)]
    #[sol(rpc)]
    contract CryptoDevExchange {
        constructor(address _CryptoDevtoken);

        function getReserve() external view returns (uint256);
        function addLiquidity(uint256 _amount) external payable returns (uint256);
        function removeLiquidity(uint256 _amount) external returns (uint256, uint256);
        function getAmountOfTokens(uint256 inputAmount, uint256 inputReserve, uint256 outputReserve) external pure returns (uint256);
        function ethToCryptoDevToken(uint256 _minTokens) external payable;
        function cryptoDevTokenToEth(uint256 _tokensSold, uint256 _minEth) external;

        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
);

// The subset of ERC20 used on the Crypto Dev token
sol!(
    #[derive(Debug)]
    #[sol(rpc)]
    contract CryptoDevToken {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
);
