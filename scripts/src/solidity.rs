//! Definitions of the Solidity constructors called during deployment

use alloy_sol_types::sol;

sol! {
    #[allow(missing_docs)]
    contract RCToken {
        constructor(uint256 initialSupply);
    }

    #[allow(missing_docs)]
    contract SCToken {
        constructor(uint256 initialSupply);
    }

    #[allow(missing_docs)]
    contract StakingController {
        constructor(
            uint256 rewardPerBlock,
            address stakingToken,
            address rewardToken,
            address admin
        );
    }
}
